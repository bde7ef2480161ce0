use thiserror::Error;

use crate::controller::ControllerId;
use crate::host::SurfaceId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("surface {0:?} is not registered with this host")]
    SurfaceNotFound(SurfaceId),

    #[error("overlay {controller:?} is still attached to surface {surface:?}")]
    AttachedElsewhere {
        controller: ControllerId,
        surface: SurfaceId,
    },

    #[error("overlay {0:?} has no host surface to present on")]
    NoHostSurface(ControllerId),
}
