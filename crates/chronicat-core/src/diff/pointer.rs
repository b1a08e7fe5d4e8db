//! JSON Pointer (RFC 6901) path building.

/// Escape a single reference token: `~` becomes `~0`, `/` becomes `~1`.
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // ~ must be escaped before /
    component.replace('~', "~0").replace('/', "~1")
}

/// Append an object key to a pointer.
pub fn child_key(parent: &str, key: &str) -> String {
    format!("{}/{}", parent, escape_component(key))
}

/// Append an array index to a pointer.
pub fn child_index(parent: &str, index: usize) -> String {
    format!("{}/{}", parent, index)
}
