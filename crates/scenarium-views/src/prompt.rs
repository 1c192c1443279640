///
/// Prompter
///
/// The user-interaction boundary panels depend on. A host binds this to
/// whatever dialog machinery it has; panels only ever ask a yes/no
/// question before something destructive or surface a single validation
/// message.
///

pub trait Prompter {
    /// Asks before a destructive action. `false` aborts it.
    fn confirm(&self, message: &str) -> bool;

    /// Surfaces one validation failure, e.g. the conflicting name.
    fn error(&self, message: &str);
}
