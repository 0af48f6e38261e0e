//! The interactive menu loop.
//!
//! Error policy: a constraint violation (duplicate key, dangling reference)
//! is reported and the menu comes back; any other error ends the session.

use airline_db::DbConnection;
use airline_schema::{select_index, Console};
use tracing::{error, info, info_span, warn};

use crate::entities::Entities;
use crate::error::Result;
use crate::reports;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateAirport,
    UpdateAirport,
    ListAirports,
    CreatePilot,
    UpdatePilot,
    ListPilots,
    CreateFlight,
    UpdateFlight,
    ListFlights,
    AssignPilot,
    ListAssignments,
    UnassignedPilots,
    FlightPilotAssignments,
    PilotSchedule,
    PilotDestinationFrequencies,
}

impl Action {
    /// Menu order; entry `n` is shown as `(n+1)`.
    pub const ALL: [Action; 15] = [
        Action::CreateAirport,
        Action::UpdateAirport,
        Action::ListAirports,
        Action::CreatePilot,
        Action::UpdatePilot,
        Action::ListPilots,
        Action::CreateFlight,
        Action::UpdateFlight,
        Action::ListFlights,
        Action::AssignPilot,
        Action::ListAssignments,
        Action::UnassignedPilots,
        Action::FlightPilotAssignments,
        Action::PilotSchedule,
        Action::PilotDestinationFrequencies,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Action::CreateAirport => "Create airport",
            Action::UpdateAirport => "Update airport",
            Action::ListAirports => "List airports",
            Action::CreatePilot => "Create pilot",
            Action::UpdatePilot => "Update pilot",
            Action::ListPilots => "List pilots",
            Action::CreateFlight => "Create flight",
            Action::UpdateFlight => "Update flight",
            Action::ListFlights => "List flights",
            Action::AssignPilot => "Assign pilot to flight",
            Action::ListAssignments => "List pilot assignments",
            Action::UnassignedPilots => "Report: unassigned pilots",
            Action::FlightPilotAssignments => "Report: pilots assigned to a flight",
            Action::PilotSchedule => "Report: pilot schedule",
            Action::PilotDestinationFrequencies => "Report: pilot destination frequencies",
        }
    }
}

/// Counters reported when the session ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub actions: usize,
    pub rejected: usize,
}

pub struct Session<'a> {
    conn: &'a DbConnection,
    entities: Entities,
}

impl<'a> Session<'a> {
    pub fn new(conn: &'a DbConnection) -> Result<Self> {
        Ok(Self {
            conn,
            entities: Entities::new()?,
        })
    }

    /// Show the menu until `0` is entered.
    pub fn run(&self, console: &mut dyn Console) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        info!(database = %self.conn.location(), "Session started");

        loop {
            console.clear()?;
            console.print("Airline operations")?;
            for (idx, action) in Action::ALL.iter().enumerate() {
                console.print(&format!("    ({}). {}", idx + 1, action.label()))?;
            }
            console.print("    (0). Exit")?;

            let Some(choice) =
                select_index(console, "Please select an action: ", Action::ALL.len(), true)?
            else {
                break;
            };
            let action = Action::ALL[choice - 1];

            let span = info_span!("action", action = action.label());
            let _guard = span.enter();

            match self.perform(action, console) {
                Ok(()) => summary.actions += 1,
                Err(err) if err.is_constraint_violation() => {
                    warn!(error = %err, "Change rejected by the database");
                    summary.rejected += 1;
                    console.print(&format!("The change was rejected: {}", err))?;
                }
                Err(err) => {
                    error!(error = %err, "Session aborted");
                    return Err(err);
                }
            }

            console.read_line("Press enter to return to the menu...")?;
        }

        info!(actions = summary.actions, rejected = summary.rejected, "Session ended");
        Ok(summary)
    }

    /// Run one menu action. Aborted picks are not errors.
    pub fn perform(&self, action: Action, console: &mut dyn Console) -> Result<()> {
        let conn = self.conn;
        let Entities {
            airports,
            pilots,
            flights,
            assignments,
        } = &self.entities;

        match action {
            Action::CreateAirport => {
                airports.create_record(conn, console)?;
            }
            Action::UpdateAirport => {
                airports.update_record(conn, console)?;
            }
            Action::ListAirports => {
                airports.list_records(conn, console)?;
            }
            Action::CreatePilot => {
                pilots.create_record(conn, console, airports)?;
            }
            Action::UpdatePilot => {
                pilots.update_record(conn, console, airports)?;
            }
            Action::ListPilots => {
                pilots.list_records(conn, console)?;
            }
            Action::CreateFlight => {
                flights.create_record(conn, console, airports)?;
            }
            Action::UpdateFlight => {
                flights.update_record(conn, console, airports)?;
            }
            Action::ListFlights => {
                flights.list_records(conn, console)?;
            }
            Action::AssignPilot => {
                assignments.assign(conn, console, pilots, flights)?;
            }
            Action::ListAssignments => {
                assignments.list_records(conn, console)?;
            }
            Action::UnassignedPilots => {
                reports::unassigned_pilots(conn, console)?;
            }
            Action::FlightPilotAssignments => {
                reports::flight_pilot_assignments(conn, console, flights)?;
            }
            Action::PilotSchedule => {
                reports::pilot_schedule(conn, console, pilots)?;
            }
            Action::PilotDestinationFrequencies => {
                reports::pilot_destination_frequencies(conn, console)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_labels_are_unique() {
        let mut labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), Action::ALL.len());
    }
}
