use serde::Serialize;

#[derive(Serialize, Debug)]
pub(crate) struct PostRoleGrantResponse {
    pub result: String,
}
