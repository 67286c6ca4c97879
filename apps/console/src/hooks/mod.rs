pub mod parties;
pub mod stages;
pub mod tasks;

use crate::api::ScriptClient;
use crate::API_CLIENT;

pub(crate) const CLIENT_MISSING: &str = "Script client is not configured";

pub(crate) fn script_client() -> Option<ScriptClient> {
    API_CLIENT.get().cloned()
}
