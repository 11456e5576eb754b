use crate::HealthRes;

/// Health check shared by every medsafe front end.
pub struct HealthService;

impl HealthService {
    /// Reports the process as alive.
    ///
    /// Upstream drug-data services are not contacted.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "medsafe is alive".into(),
        }
    }
}
