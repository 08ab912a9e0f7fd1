/// One step of a saga: a local transaction on some external service.
///
/// Implementations perform their forward work in [`execute`](Self::execute)
/// and revert it in [`compensate`](Self::compensate). A failed `execute` must
/// leave nothing behind that needs compensating; the coordinator never
/// compensates the participant whose `execute` failed.
pub trait Participant: Send + Sync {
    /// Error type for both directions.
    type Error;

    /// Stable identifier, used as the key for compensation errors.
    ///
    /// Should be unique among the participants of one saga.
    fn name(&self) -> &str;

    /// Perform the forward local transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction did not take effect.
    fn execute(&self) -> Result<(), Self::Error>;

    /// Reverse a previously successful [`execute`](Self::execute).
    ///
    /// The coordinator calls this at most once per saga. The default
    /// implementation does nothing, which suits read-only participants.
    ///
    /// # Errors
    ///
    /// Returns an error if the compensation failed. The coordinator records
    /// it and keeps compensating earlier participants.
    fn compensate(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Human-readable description of what compensation will do.
    fn compensation_description(&self) -> String {
        format!("undo {}", self.name())
    }
}
