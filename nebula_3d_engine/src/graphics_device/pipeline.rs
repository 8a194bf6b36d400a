/// Pipeline marker trait
///
/// Pipeline creation (shader compilation, reflection, fixed-function state)
/// is outside the core: pipelines enter the seam as pre-built backend handles.
/// This is a marker trait - binding is done via CommandList::bind_pipeline()
/// and the backend implementation holds the actual GPU pipeline handle.
pub trait Pipeline: Send + Sync {}
