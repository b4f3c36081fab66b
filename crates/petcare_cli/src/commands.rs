//! Subcommand execution against an open store.
//!
//! # Responsibility
//! - Translate parsed arguments into manager calls.
//! - Render results as plain lines on the supplied writer.
//!
//! # Invariants
//! - Every command uses the caller's connection and reference date; nothing
//!   here reads the clock.

use crate::args::{
    nullable, AddPetArgs, AddRecordArgs, Command, ScheduleArgs, UpdateAppointmentArgs,
    UpdatePetArgs,
};
use anyhow::{bail, Result};
use chrono::NaiveDate;
use petcare_core::{
    format_iso_date, seed_sample_data, Appointment, AppointmentService, AppointmentUpdate,
    CreateAppointmentRequest, CreateMedicalRecordRequest, CreatePetRequest, MedicalRecord,
    MedicalRecordService, Owner, OwnerPatch, OwnerService, Pet, PetPatch, PetService,
    SqliteAppointmentRepository, SqliteMedicalRecordRepository, SqliteOwnerRepository,
    SqlitePetRepository,
};
use rusqlite::Connection;
use std::io::Write;

type Owners<'conn> = OwnerService<SqliteOwnerRepository<'conn>>;
type Pets<'conn> = PetService<SqlitePetRepository<'conn>>;
type Appointments<'conn> = AppointmentService<SqliteAppointmentRepository<'conn>>;
type Records<'conn> = MedicalRecordService<SqliteMedicalRecordRepository<'conn>>;

fn owners(conn: &Connection) -> Result<Owners<'_>> {
    Ok(OwnerService::new(SqliteOwnerRepository::try_new(conn)?))
}

fn pets(conn: &Connection) -> Result<Pets<'_>> {
    Ok(PetService::new(SqlitePetRepository::try_new(conn)?))
}

fn appointments(conn: &Connection) -> Result<Appointments<'_>> {
    Ok(AppointmentService::new(SqliteAppointmentRepository::try_new(conn)?))
}

fn records(conn: &Connection) -> Result<Records<'_>> {
    Ok(MedicalRecordService::new(SqliteMedicalRecordRepository::try_new(conn)?))
}

/// Runs one subcommand and writes its output to `out`.
pub fn execute(
    conn: &Connection,
    command: Command,
    today: NaiveDate,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::AddOwner { name, contact } => {
            let owner = owners(conn)?.create(&name, &contact)?;
            writeln!(out, "added owner {}", owner_line(&owner))?;
        }
        Command::ListOwners => {
            let all = owners(conn)?.list_all()?;
            write_lines(out, "owners", all.iter().map(owner_line))?;
        }
        Command::FindOwners { query } => {
            let found = owners(conn)?.find_by_name_substring(&query)?;
            write_lines(out, "owners", found.iter().map(owner_line))?;
        }
        Command::ShowOwner { id } => {
            let service = owners(conn)?;
            let Some(owner) = service.get_by_id(id)? else {
                bail!("owner {id} not found");
            };
            writeln!(out, "{}", owner_line(&owner))?;
            writeln!(out, "pets: {}", service.pet_count(id)?)?;
        }
        Command::UpdateOwner { id, name, contact } => {
            let owner = owners(conn)?.update(id, OwnerPatch { name, contact })?;
            writeln!(out, "updated owner {}", owner_line(&owner))?;
        }
        Command::DeleteOwner { id } => {
            owners(conn)?.delete(id)?;
            writeln!(out, "deleted owner #{id}")?;
        }

        Command::AddPet(args) => add_pet(conn, args, out)?,
        Command::ListPets => {
            let all = pets(conn)?.list_all()?;
            write_lines(out, "pets", all.iter().map(pet_line))?;
        }
        Command::OwnerPets { owner_id } => {
            let owned = pets(conn)?.find_by_owner(owner_id)?;
            write_lines(out, "pets", owned.iter().map(pet_line))?;
        }
        Command::FindPets { query } => {
            let found = pets(conn)?.find_by_name_substring(&query)?;
            write_lines(out, "pets", found.iter().map(pet_line))?;
        }
        Command::ShowPet { id } => {
            let service = pets(conn)?;
            let Some(pet) = service.get_by_id(id)? else {
                bail!("pet {id} not found");
            };
            let dependents = service.dependents(id)?;
            writeln!(out, "{}", pet_line(&pet))?;
            writeln!(
                out,
                "appointments: {} medical records: {}",
                dependents.appointments, dependents.medical_records
            )?;
        }
        Command::UpdatePet(args) => update_pet(conn, args, out)?,
        Command::DeletePet { id } => {
            pets(conn)?.delete(id)?;
            writeln!(out, "deleted pet #{id}")?;
        }

        Command::Schedule(args) => schedule(conn, args, out)?,
        Command::Appointments { pet_id } => {
            let all = appointments(conn)?.list_for_pet(pet_id)?;
            write_lines(out, "appointments", all.iter().map(appointment_line))?;
        }
        Command::Upcoming { pet_id } => {
            let upcoming = appointments(conn)?.upcoming_for_pet(pet_id, today)?;
            write_lines(out, "upcoming appointments", upcoming.iter().map(appointment_line))?;
        }
        Command::Past { pet_id } => {
            let past = appointments(conn)?.past_for_pet(pet_id, today)?;
            write_lines(out, "past appointments", past.iter().map(appointment_line))?;
        }
        Command::Next { pet_id } => match appointments(conn)?.next_for_pet(pet_id, today)? {
            Some(next) => writeln!(out, "#{} {}", next.id, format_iso_date(next.date))?,
            None => writeln!(out, "no upcoming appointments")?,
        },
        Command::OwnerUpcoming { owner_id } => {
            let report = appointments(conn)?.upcoming_for_owner(owner_id)?;
            write_lines(
                out,
                "appointments",
                report.iter().map(|row| {
                    format!(
                        "#{} {} {}",
                        row.appointment_id,
                        format_iso_date(row.date),
                        row.pet_name
                    )
                }),
            )?;
        }
        Command::UpdateAppointment(args) => update_appointment(conn, args, out)?,
        Command::CancelAppointment { id } => {
            appointments(conn)?.delete(id)?;
            writeln!(out, "cancelled appointment #{id}")?;
        }

        Command::AddRecord(args) => add_record(conn, args, out)?,
        Command::Records { pet_id } => {
            let history = records(conn)?.list_for_pet(pet_id)?;
            write_lines(out, "medical records", history.iter().map(record_line))?;
        }
        Command::OwnerRecords { owner_id } => {
            let history = records(conn)?.list_for_owner(owner_id)?;
            write_lines(out, "medical records", history.iter().map(record_line))?;
        }
        Command::DeleteRecord { id } => {
            records(conn)?.delete(id)?;
            writeln!(out, "deleted medical record #{id}")?;
        }

        Command::Seed => {
            let summary = seed_sample_data(conn, today)?;
            writeln!(
                out,
                "seeded {} owners, {} pets, {} appointments, {} medical records",
                summary.owners, summary.pets, summary.appointments, summary.medical_records
            )?;
        }
    }
    Ok(())
}

fn add_pet(conn: &Connection, args: AddPetArgs, out: &mut dyn Write) -> Result<()> {
    let pet = pets(conn)?.create(CreatePetRequest {
        name: args.name,
        species: args.species,
        breed: args.breed,
        age: args.age,
        owner_id: args.owner_id,
    })?;
    writeln!(out, "added pet {}", pet_line(&pet))?;
    Ok(())
}

fn update_pet(conn: &Connection, args: UpdatePetArgs, out: &mut dyn Write) -> Result<()> {
    let patch = PetPatch {
        name: args.name,
        species: args.species,
        breed: nullable(args.breed, args.clear_breed),
        age: nullable(args.age, args.clear_age),
        owner_id: nullable(args.owner_id, args.clear_owner),
    };
    let pet = pets(conn)?.update(args.id, patch)?;
    writeln!(out, "updated pet {}", pet_line(&pet))?;
    Ok(())
}

fn schedule(conn: &Connection, args: ScheduleArgs, out: &mut dyn Write) -> Result<()> {
    let appointment = appointments(conn)?.create(CreateAppointmentRequest {
        pet_id: args.pet_id,
        date: args.date,
        reason: args.reason,
        vet_name: args.vet_name,
        notes: args.notes,
    })?;
    writeln!(out, "scheduled {}", appointment_line(&appointment))?;
    Ok(())
}

fn update_appointment(
    conn: &Connection,
    args: UpdateAppointmentArgs,
    out: &mut dyn Write,
) -> Result<()> {
    // Blank text is stored as absent, so an empty value clears the field.
    let update = AppointmentUpdate {
        pet_id: args.pet_id,
        date: args.date,
        reason: args.reason.map(Some),
        vet_name: args.vet_name.map(Some),
        notes: args.notes.map(Some),
    };
    let appointment = appointments(conn)?.update(args.id, update)?;
    writeln!(out, "updated {}", appointment_line(&appointment))?;
    Ok(())
}

fn add_record(conn: &Connection, args: AddRecordArgs, out: &mut dyn Write) -> Result<()> {
    let record = records(conn)?.create(CreateMedicalRecordRequest {
        pet_id: args.pet_id,
        kind: args.kind,
        name: args.name,
        date: args.date,
        notes: args.notes,
    })?;
    writeln!(out, "added {}", record_line(&record))?;
    Ok(())
}

fn write_lines(
    out: &mut dyn Write,
    label: &str,
    lines: impl Iterator<Item = String>,
) -> Result<()> {
    let mut written = 0usize;
    for line in lines {
        writeln!(out, "{line}")?;
        written += 1;
    }
    if written == 0 {
        writeln!(out, "no {label} found")?;
    }
    Ok(())
}

fn owner_line(owner: &Owner) -> String {
    format!("#{} {} ({})", owner.id, owner.name, owner.contact)
}

fn pet_line(pet: &Pet) -> String {
    let mut line = format!("#{} {} [{}", pet.id, pet.name, pet.species);
    if let Some(breed) = &pet.breed {
        line.push_str(", ");
        line.push_str(breed);
    }
    line.push(']');
    if let Some(age) = pet.age {
        line.push_str(&format!(" age {age}"));
    }
    match pet.owner_id {
        Some(owner_id) => line.push_str(&format!(" owner #{owner_id}")),
        None => line.push_str(" no owner"),
    }
    line
}

fn appointment_line(appointment: &Appointment) -> String {
    let mut line = format!(
        "#{} {} pet #{}",
        appointment.id,
        format_iso_date(appointment.date),
        appointment.pet_id
    );
    if let Some(reason) = &appointment.reason {
        line.push_str(&format!(" {reason}"));
    }
    if let Some(vet) = &appointment.vet_name {
        line.push_str(&format!(" with {vet}"));
    }
    if let Some(notes) = &appointment.notes {
        line.push_str(&format!(" ({notes})"));
    }
    line
}

fn record_line(record: &MedicalRecord) -> String {
    let mut line = format!(
        "#{} {} pet #{} {}: {}",
        record.id,
        format_iso_date(record.date),
        record.pet_id,
        record.kind,
        record.name
    );
    if let Some(notes) = &record.notes {
        line.push_str(&format!(" ({notes})"));
    }
    line
}
