use factacl_application::AccessGrantService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_grant_service: AccessGrantService,
}
