pub(crate) struct GrantedRoleData {
    pub email: String,
    pub role: String,
}
