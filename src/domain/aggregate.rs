// ============================================================================
// Aggregate Root Pattern
// ============================================================================
//
// Key Principles:
// 1. Commands are validated against current state before anything changes
// 2. A validated command yields an event describing what happened
// 3. State changes only by applying events
// 4. Aggregates enforce business invariants
//
// Aggregates here are held in memory; events are not persisted. They keep the
// check and the mutation separate so a rejected command never touches state.
//
// ============================================================================

pub trait Aggregate: Sized + Send + Sync {
    type Command;
    type Event;
    type Error;

    /// Validate a command against current state (business logic)
    fn handle_command(&self, command: &Self::Command) -> Result<Self::Event, Self::Error>;

    /// Apply an already-validated event
    fn apply_event(&mut self, event: &Self::Event);

    /// Validate then apply
    fn execute(&mut self, command: &Self::Command) -> Result<Self::Event, Self::Error> {
        let event = self.handle_command(command)?;
        self.apply_event(&event);
        Ok(event)
    }
}
