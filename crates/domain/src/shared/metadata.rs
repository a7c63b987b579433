use std::collections::HashMap;

/// Opaque auxiliary data that API consumers can attach to an entity.
/// Kept as a typed string map instead of a free-form blob.
pub type Metadata = HashMap<String, String>;
