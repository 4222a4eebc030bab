pub mod json;
pub mod text;

/// Captured diff-stat invocation for the "Lines changed" section.
/// Present only when history holds at least two snapshots.
pub struct DiffSection {
    /// The literal command line, space-joined.
    pub command: String,
    /// The command's captured standard output.
    pub output: String,
}
