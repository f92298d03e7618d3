/// Outcome of offering a key to an overlay component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed; nothing for the app to do
  Handled,
  /// Consumed, and the app must act on this event
  Event(T),
  /// Not consumed; the app handles the key itself
  NotHandled,
}
