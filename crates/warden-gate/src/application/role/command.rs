pub(crate) struct GrantRoleCommand {
    pub email: String,
    pub role: String,
}
