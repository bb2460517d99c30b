// Extension traits over third-party types.
//
// Keep these minimal and generic; domain logic belongs in the core modules.

pub mod serde_json;
