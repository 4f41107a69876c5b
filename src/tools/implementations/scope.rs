// ABOUTME: Resolves program, clinic and location tool arguments to configuration ids
// ABOUTME: A miss becomes the not-found message the tool answers with

use std::fmt;

use crate::database::ConfigurationsDatabase;
use crate::errors::AppResult;

/// Ids for a program / clinic / location filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Scope {
    pub program_id: Option<String>,
    pub clinic_id: Option<String>,
    pub clinic_name: Option<String>,
    pub location_id: Option<String>,
}

/// Why a filter could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ScopeMiss {
    Program(String),
    Clinic(String),
    Location(String),
    LocationWithoutClinic,
}

impl fmt::Display for ScopeMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Program(name) => write!(f, "Program not found: {name}"),
            Self::Clinic(name) => write!(f, "Clinic not found: {name}"),
            Self::Location(name) => write!(f, "Location not found: {name}"),
            Self::LocationWithoutClinic => {
                f.write_str("Location filter requires a clinic to be specified.")
            }
        }
    }
}

/// Program id by name or prefix
pub(super) async fn resolve_program(
    db: &ConfigurationsDatabase,
    program: Option<&str>,
) -> AppResult<Result<Option<String>, ScopeMiss>> {
    let Some(program) = program else {
        return Ok(Ok(None));
    };
    Ok(db
        .resolve_program_id(program)
        .await?
        .map(Some)
        .ok_or_else(|| ScopeMiss::Program(program.to_owned())))
}

/// Resolve a full scope; a clinic given without a program is searched
/// across all programs and determines the program
pub(super) async fn resolve_scope(
    db: &ConfigurationsDatabase,
    program: Option<&str>,
    clinic: Option<&str>,
    location: Option<&str>,
) -> AppResult<Result<Scope, ScopeMiss>> {
    let mut scope = Scope {
        program_id: match resolve_program(db, program).await? {
            Ok(program_id) => program_id,
            Err(miss) => return Ok(Err(miss)),
        },
        ..Scope::default()
    };

    if let Some(clinic) = clinic {
        if let Some(program_id) = &scope.program_id {
            let Some(clinic_id) = db.resolve_clinic_id(clinic, program_id).await? else {
                return Ok(Err(ScopeMiss::Clinic(clinic.to_owned())));
            };
            scope.clinic_name = Some(db.clinic_name(&clinic_id).await?);
            scope.clinic_id = Some(clinic_id);
        } else {
            let Some(found) = db.find_clinic(clinic).await? else {
                return Ok(Err(ScopeMiss::Clinic(clinic.to_owned())));
            };
            scope.program_id = Some(found.program_id);
            scope.clinic_id = Some(found.clinic_id);
            scope.clinic_name = Some(found.name);
        }
    }

    if let Some(location) = location {
        let Some(clinic_id) = &scope.clinic_id else {
            return Ok(Err(ScopeMiss::LocationWithoutClinic));
        };
        let Some(location_id) = db.resolve_location_id(location, clinic_id).await? else {
            return Ok(Err(ScopeMiss::Location(location.to_owned())));
        };
        scope.location_id = Some(location_id);
    }

    Ok(Ok(scope))
}
