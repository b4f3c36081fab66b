//! Command-line surface.
//!
//! # Responsibility
//! - Declare one subcommand per manager operation.
//! - Resolve global flags that override the environment.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use petcare_core::{parse_iso_date, RecordKind, ValidationError};
use std::path::PathBuf;

/// PetCare - owners, pets, appointments and medical history
#[derive(Parser, Debug)]
#[command(name = "petcare")]
#[command(version, about = "Record keeping for a small veterinary practice", long_about = None)]
pub struct Cli {
    /// SQLite store file (overrides PETCARE_DB)
    #[arg(long = "db", global = true)]
    pub db: Option<PathBuf>,

    /// Absolute directory for rolling log files (overrides PETCARE_LOG_DIR)
    #[arg(long = "log-dir", global = true)]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides PETCARE_LOG_LEVEL)
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Reference date for upcoming/past queries and seeding (default: local date)
    #[arg(long = "today", value_name = "YYYY-MM-DD", global = true, value_parser = parse_today)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register an owner
    AddOwner { name: String, contact: String },
    /// List all owners
    ListOwners,
    /// Find owners whose name contains QUERY
    FindOwners { query: String },
    /// Show one owner with their pet count
    ShowOwner { id: i64 },
    /// Change an owner's name or contact
    UpdateOwner {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        contact: Option<String>,
    },
    /// Delete an owner that has no pets
    DeleteOwner { id: i64 },

    /// Register a pet
    AddPet(AddPetArgs),
    /// List all pets
    ListPets,
    /// List the pets of one owner
    OwnerPets { owner_id: i64 },
    /// Find pets whose name contains QUERY
    FindPets { query: String },
    /// Show one pet
    ShowPet { id: i64 },
    /// Change pet fields; nullable fields can be cleared
    UpdatePet(UpdatePetArgs),
    /// Delete a pet that has no appointments or medical history
    DeletePet { id: i64 },

    /// Schedule an appointment
    Schedule(ScheduleArgs),
    /// Full appointment history of a pet
    Appointments { pet_id: i64 },
    /// Appointments on or after today
    Upcoming { pet_id: i64 },
    /// Appointments before today
    Past { pet_id: i64 },
    /// Soonest appointment on or after today
    Next { pet_id: i64 },
    /// Every appointment across an owner's pets
    OwnerUpcoming { owner_id: i64 },
    /// Change appointment fields; pass an empty string to clear text
    UpdateAppointment(UpdateAppointmentArgs),
    /// Remove an appointment
    CancelAppointment { id: i64 },

    /// Add a vaccination or treatment entry
    AddRecord(AddRecordArgs),
    /// Medical history of a pet
    Records { pet_id: i64 },
    /// Medical history across an owner's pets
    OwnerRecords { owner_id: i64 },
    /// Remove a medical record
    DeleteRecord { id: i64 },

    /// Fill an empty store with sample data
    Seed,
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddOwner { .. } => "add-owner",
            Self::ListOwners => "list-owners",
            Self::FindOwners { .. } => "find-owners",
            Self::ShowOwner { .. } => "show-owner",
            Self::UpdateOwner { .. } => "update-owner",
            Self::DeleteOwner { .. } => "delete-owner",
            Self::AddPet(_) => "add-pet",
            Self::ListPets => "list-pets",
            Self::OwnerPets { .. } => "owner-pets",
            Self::FindPets { .. } => "find-pets",
            Self::ShowPet { .. } => "show-pet",
            Self::UpdatePet(_) => "update-pet",
            Self::DeletePet { .. } => "delete-pet",
            Self::Schedule(_) => "schedule",
            Self::Appointments { .. } => "appointments",
            Self::Upcoming { .. } => "upcoming",
            Self::Past { .. } => "past",
            Self::Next { .. } => "next",
            Self::OwnerUpcoming { .. } => "owner-upcoming",
            Self::UpdateAppointment(_) => "update-appointment",
            Self::CancelAppointment { .. } => "cancel-appointment",
            Self::AddRecord(_) => "add-record",
            Self::Records { .. } => "records",
            Self::OwnerRecords { .. } => "owner-records",
            Self::DeleteRecord { .. } => "delete-record",
            Self::Seed => "seed",
        }
    }
}

#[derive(Args, Debug)]
pub struct AddPetArgs {
    pub name: String,
    pub species: String,
    #[arg(long)]
    pub breed: Option<String>,
    #[arg(long)]
    pub age: Option<u32>,
    #[arg(long = "owner")]
    pub owner_id: Option<i64>,
}

#[derive(Args, Debug)]
pub struct UpdatePetArgs {
    pub id: i64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub species: Option<String>,
    #[arg(long, conflicts_with = "clear_breed")]
    pub breed: Option<String>,
    #[arg(long)]
    pub clear_breed: bool,
    #[arg(long, conflicts_with = "clear_age")]
    pub age: Option<u32>,
    #[arg(long)]
    pub clear_age: bool,
    #[arg(long = "owner", conflicts_with = "clear_owner")]
    pub owner_id: Option<i64>,
    #[arg(long)]
    pub clear_owner: bool,
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    pub pet_id: i64,
    /// YYYY-MM-DD
    pub date: String,
    #[arg(long)]
    pub reason: Option<String>,
    #[arg(long = "vet")]
    pub vet_name: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateAppointmentArgs {
    pub id: i64,
    #[arg(long = "pet")]
    pub pet_id: Option<i64>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub reason: Option<String>,
    #[arg(long = "vet")]
    pub vet_name: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct AddRecordArgs {
    pub pet_id: i64,
    /// vaccination|treatment
    pub kind: RecordKind,
    /// Vaccine or treatment label
    pub name: String,
    /// YYYY-MM-DD
    pub date: String,
    #[arg(long)]
    pub notes: Option<String>,
}

fn parse_today(value: &str) -> Result<NaiveDate, ValidationError> {
    parse_iso_date("today", value)
}

/// Maps a set/clear flag pair onto a nullable patch field.
pub fn nullable<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::{nullable, Cli, Command};
    use clap::{CommandFactory, Parser};
    use petcare_core::RecordKind;

    #[test]
    fn command_names_match_clap_subcommands() {
        let cases: &[&[&str]] = &[
            &["add-owner", "Alice Johnson", "0710000001"],
            &["list-owners"],
            &["show-owner", "1"],
            &["add-pet", "Buddy", "Dog"],
            &["update-pet", "1", "--clear-breed"],
            &["owner-upcoming", "1"],
            &["update-appointment", "1", "--notes", ""],
            &["add-record", "1", "treatment", "Deworming", "2024-11-01"],
            &["delete-record", "2"],
            &["seed"],
        ];
        for argv in cases {
            let matches = Cli::command()
                .try_get_matches_from(std::iter::once("petcare").chain(argv.iter().copied()))
                .unwrap();
            let cli = Cli::try_parse_from(std::iter::once("petcare").chain(argv.iter().copied()))
                .unwrap();
            assert_eq!(Some(cli.command.name()), matches.subcommand_name());
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "petcare",
            "upcoming",
            "3",
            "--today",
            "2025-01-01",
            "--db",
            "/tmp/x.sqlite3",
        ])
        .unwrap();
        assert_eq!(cli.today.unwrap().to_string(), "2025-01-01");
        assert!(matches!(cli.command, Command::Upcoming { pet_id: 3 }));
    }

    #[test]
    fn malformed_today_is_rejected() {
        assert!(Cli::try_parse_from(["petcare", "--today", "2025-1-5", "list-pets"]).is_err());
    }

    #[test]
    fn record_kind_parses_from_text() {
        let cli = Cli::try_parse_from([
            "petcare",
            "add-record",
            "1",
            "Vaccination",
            "Rabies",
            "2024-01-01",
        ])
        .unwrap();
        match cli.command {
            Command::AddRecord(args) => assert_eq!(args.kind, RecordKind::Vaccination),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(
            Cli::try_parse_from(["petcare", "add-record", "1", "surgery", "X", "2024-01-01"])
                .is_err()
        );
    }

    #[test]
    fn clear_flag_conflicts_with_value() {
        assert!(Cli::try_parse_from([
            "petcare",
            "update-pet",
            "1",
            "--age",
            "3",
            "--clear-age"
        ])
        .is_err());
        assert_eq!(nullable(Some(3), false), Some(Some(3)));
        assert_eq!(nullable::<u32>(None, true), Some(None));
        assert_eq!(nullable::<u32>(None, false), None);
    }
}
