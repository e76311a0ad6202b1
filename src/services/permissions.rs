//! Permission gate used to decide whether a guarded action or view is shown.

use crate::models::user::Permissions;

/// How a list of required capabilities is combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Every required capability must be granted.
    #[default]
    All,
    /// At least one required capability must be granted.
    Any,
}

/// The capability (or capabilities) a caller needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Required<'a> {
    One(&'a str),
    Many(&'a [&'a str]),
}

impl<'a> From<&'a str> for Required<'a> {
    fn from(capability: &'a str) -> Self {
        Required::One(capability)
    }
}

impl<'a> From<&'a [&'a str]> for Required<'a> {
    fn from(capabilities: &'a [&'a str]) -> Self {
        Required::Many(capabilities)
    }
}

impl<'a, const N: usize> From<&'a [&'a str; N]> for Required<'a> {
    fn from(capabilities: &'a [&'a str; N]) -> Self {
        Required::Many(capabilities.as_slice())
    }
}

/// Check `required` against the capabilities granted on `slice`.
///
/// An unknown slice grants nothing. Capabilities missing from a known slice
/// count as not granted. An empty list passes under `All` and fails under
/// `Any`.
pub fn has_permission<'a>(
    permissions: &Permissions,
    slice: &str,
    required: impl Into<Required<'a>>,
    mode: Mode,
) -> bool {
    let Some(granted) = permissions.slice(slice) else {
        return false;
    };
    let is_granted = |capability: &str| granted.get(capability).copied().unwrap_or(false);

    match required.into() {
        Required::One(capability) => is_granted(capability),
        Required::Many(capabilities) => match mode {
            Mode::All => capabilities.iter().all(|c| is_granted(c)),
            Mode::Any => capabilities.iter().any(|c| is_granted(c)),
        },
    }
}

/// Produce the guarded value only when the gate passes.
pub fn show_for_permission<'a, T>(
    permissions: &Permissions,
    slice: &str,
    required: impl Into<Required<'a>>,
    mode: Mode,
    render: impl FnOnce() -> T,
) -> Option<T> {
    has_permission(permissions, slice, required, mode).then(render)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content_read_only() -> Permissions {
        let mut permissions = Permissions::default();
        permissions
            .set("content", "read", true)
            .set("content", "write", false);
        permissions
    }

    fn allowed<'a>(slice: &str, required: impl Into<Required<'a>>, mode: Mode) -> bool {
        has_permission(&content_read_only(), slice, required, mode)
    }

    #[test]
    fn all_requires_every_capability() {
        assert!(!allowed("content", &["read", "write"], Mode::All));
        assert!(allowed("content", &["read"], Mode::All));
    }

    #[test]
    fn any_needs_one_capability() {
        assert!(allowed("content", &["read", "write"], Mode::Any));
        assert!(!allowed("content", &["write", "delete"], Mode::Any));
    }

    #[test]
    fn unknown_slice_fails_closed() {
        assert!(!allowed("foo", "read", Mode::All));
        assert!(!allowed("foo", &["read"], Mode::Any));
        assert!(!allowed("foo", &[] as &[&str; 0], Mode::All));
    }

    #[test]
    fn single_capability_ignores_mode() {
        assert!(allowed("content", "read", Mode::Any));
        assert!(allowed("content", "read", Mode::All));
        assert!(!allowed("content", "write", Mode::Any));
        assert!(!allowed("content", "delete", Mode::All));
    }

    #[test]
    fn empty_requirement_on_known_slice() {
        let none: &[&str] = &[];
        assert!(allowed("content", none, Mode::All));
        assert!(!allowed("content", none, Mode::Any));
    }

    #[test]
    fn show_for_permission_renders_only_when_allowed() {
        let permissions = content_read_only();
        let table = show_for_permission(&permissions, "content", "read", Mode::All, || "table");
        let edit = show_for_permission(&permissions, "content", "write", Mode::All, || "edit");

        assert_eq!(Mode::default(), Mode::All);
        assert_eq!(table, Some("table"));
        assert_eq!(edit, None);
    }
}
