// ABOUTME: Demo data for the configurations and requirements databases
// ABOUTME: Dates are relative to a given day so review and expiry states stay meaningful

//! Demo data seeding.
//!
//! The configurations seed produces, relative to `today`:
//! - 6 users (4 active, 1 terminated still holding a grant, 1 inactive)
//! - 7 active grants: 2 overdue for review, 1 due within 30 days, 4 current
//! - training where 1 active user is compliant, 2 have expired training and
//!   1 is missing training
//! - `appointment_reminder_days` set at program, clinic and location level
//!
//! The requirements seed produces 3 clients, 3 programs and a `PROP` program
//! with partial coverage, an approved story without tests and mixed test
//! results.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::info;

use super::{format_date, ConfigurationsDatabase, RequirementsDatabase};
use crate::errors::{AppError, AppResult};
use crate::models::access::{NewAccessGrant, NewTraining, NewUser, TrainingStatus, UserStatus};
use crate::models::requirements::{Requirement, TestCase, UserStory};

/// What a seeding run inserted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    /// Rows inserted per table
    pub rows: Vec<(&'static str, usize)>,
}

impl SeedSummary {
    fn record(&mut self, table: &'static str, count: usize) {
        self.rows.push((table, count));
    }
}

struct DemoUser {
    name: &'static str,
    email: &'static str,
    organization: &'static str,
    is_business_associate: bool,
    status: UserStatus,
}

const DEMO_USERS: [DemoUser; 6] = [
    DemoUser {
        name: "Alice Nguyen",
        email: "alice.nguyen@propelhealth.example",
        organization: "Internal",
        is_business_associate: false,
        status: UserStatus::Active,
    },
    DemoUser {
        name: "Brian Ortiz",
        email: "brian.ortiz@franzclinic.example",
        organization: "Franz Clinic",
        is_business_associate: false,
        status: UserStatus::Active,
    },
    DemoUser {
        name: "Carla Diaz",
        email: "carla.diaz@mercyhealth.example",
        organization: "Mercy Health",
        is_business_associate: false,
        status: UserStatus::Active,
    },
    DemoUser {
        name: "Derek Shaw",
        email: "derek.shaw@labvendor.example",
        organization: "LabVendor Inc",
        is_business_associate: true,
        status: UserStatus::Active,
    },
    DemoUser {
        name: "Erin Walsh",
        email: "erin.walsh@propelhealth.example",
        organization: "Internal",
        is_business_associate: false,
        status: UserStatus::Terminated,
    },
    DemoUser {
        name: "Frank Moore",
        email: "frank.moore@consultco.example",
        organization: "ConsultCo",
        is_business_associate: true,
        status: UserStatus::Inactive,
    },
];

/// Populate the configurations database
///
/// # Errors
///
/// Returns an error if any insert fails, including when the demo rows
/// already exist
pub async fn seed_configurations(
    db: &ConfigurationsDatabase,
    today: NaiveDate,
) -> AppResult<SeedSummary> {
    let days_ago = |days: i64| today - Duration::days(days);
    let days_ahead = |days: i64| today + Duration::days(days);
    let mut summary = SeedSummary::default();

    let p4m = db
        .create_program("Prevention4ME", "P4M", Some("Clinical"))
        .await?;
    let prop = db
        .create_program("Propel Analytics", "PROP", Some("Platform"))
        .await?;
    summary.record("programs", 2);

    let franz = db.create_clinic(&p4m, "Franz Clinic", Some("FRANZ")).await?;
    let mercy = db.create_clinic(&p4m, "Mercy Health", Some("MERCY")).await?;
    let central_lab = db.create_clinic(&prop, "Central Lab", Some("CLAB")).await?;
    summary.record("clinics", 3);

    let richland = db.create_location(&franz, "Richland", Some("RICH")).await?;
    let kennewick = db.create_location(&franz, "Kennewick", Some("KENN")).await?;
    let downtown = db.create_location(&mercy, "Downtown", Some("DTWN")).await?;
    summary.record("locations", 3);

    let mut user_ids = Vec::with_capacity(DEMO_USERS.len());
    for demo in &DEMO_USERS {
        let user = NewUser {
            name: demo.name.to_owned(),
            email: demo.email.to_owned(),
            organization: demo.organization.to_owned(),
            is_business_associate: demo.is_business_associate,
        };
        let user_id = db.create_user(&user, days_ago(600)).await?;
        if demo.status != UserStatus::Active {
            db.set_user_status(&user_id, demo.status).await?;
        }
        user_ids.push(user_id);
    }
    summary.record("users", DEMO_USERS.len());
    let [alice, brian, carla, derek, erin, frank]: [String; 6] = user_ids
        .try_into()
        .map_err(|_| AppError::internal("Demo user list changed size"))?;
    let (alice, brian, carla, derek, erin, frank) = (&alice, &brian, &carla, &derek, &erin, &frank);

    let grants = [
        (alice, &p4m, None, None, "Admin", 400),
        (alice, &prop, None, None, "Analyst", 100),
        (brian, &p4m, Some(&franz), None, "Clinic Manager", 350),
        (brian, &p4m, Some(&franz), Some(&richland), "Coordinator", 200),
        (carla, &p4m, Some(&mercy), Some(&downtown), "Nurse", 370),
        (derek, &prop, Some(&central_lab), None, "Lab Liaison", 30),
        (erin, &p4m, Some(&franz), Some(&kennewick), "Coordinator", 300),
        (frank, &p4m, Some(&franz), None, "Consultant", 500),
    ];
    let mut access_ids = Vec::with_capacity(grants.len());
    for (user_id, program_id, clinic_id, location_id, role, granted_days_ago) in grants {
        let access_id = db
            .grant_access(&NewAccessGrant {
                user_id,
                program_id,
                clinic_id: clinic_id.map(String::as_str),
                location_id: location_id.map(String::as_str),
                role,
                granted_date: days_ago(granted_days_ago),
                granted_by: Some("Alice Nguyen"),
            })
            .await?;
        access_ids.push(access_id);
    }
    summary.record("user_access", access_ids.len());

    if let [_, _, _, brian_richland, _, derek_lab, _, frank_franz] = access_ids.as_slice() {
        db.revoke_access(frank_franz, days_ago(100), Some("Contract ended"))
            .await?;
        db.record_review(
            brian_richland,
            days_ago(30),
            Some("Alice Nguyen"),
            "Keep",
            None,
        )
        .await?;
        db.record_review(derek_lab, days_ago(10), Some("Alice Nguyen"), "Keep", None)
            .await?;
        summary.record("access_reviews", 2);
    }

    let training = [
        (alice, "HIPAA", TrainingStatus::Current, Some(days_ahead(200))),
        (alice, "Cybersecurity", TrainingStatus::Current, Some(days_ahead(100))),
        (brian, "HIPAA", TrainingStatus::Current, Some(days_ahead(50))),
        (brian, "Cybersecurity", TrainingStatus::Current, Some(days_ago(10))),
        (carla, "HIPAA", TrainingStatus::Pending, None),
        (derek, "HIPAA", TrainingStatus::Expired, Some(days_ago(40))),
        (derek, "Cybersecurity", TrainingStatus::Current, Some(days_ahead(300))),
        (erin, "HIPAA", TrainingStatus::Current, Some(days_ahead(120))),
    ];
    for (user_id, training_type, status, expires_date) in training {
        let completed_date = expires_date.map(|expires| expires - Duration::days(365));
        db.add_training(&NewTraining {
            user_id,
            training_type,
            status,
            assigned_date: completed_date.unwrap_or_else(|| days_ago(5)) - Duration::days(7),
            completed_date: (status != TrainingStatus::Pending)
                .then_some(completed_date)
                .flatten(),
            expires_date,
        })
        .await?;
    }
    summary.record("user_training", training.len());

    db.define_config(
        "appointment_reminder_days",
        "Appointment Reminder Days",
        Some("Scheduling"),
        Some("2"),
        Some("Days before an appointment that reminders are sent"),
    )
    .await?;
    db.define_config(
        "portal_theme",
        "Patient Portal Theme",
        Some("Branding"),
        Some("standard"),
        None,
    )
    .await?;
    db.define_config(
        "max_daily_appointments",
        "Max Daily Appointments",
        Some("Scheduling"),
        None,
        Some("Upper bound on bookable appointments per day"),
    )
    .await?;
    summary.record("config_definitions", 3);

    db.set_config_value("appointment_reminder_days", &p4m, None, None, "3")
        .await?;
    db.set_config_value("appointment_reminder_days", &p4m, Some(&franz), None, "5")
        .await?;
    db.set_config_value(
        "appointment_reminder_days",
        &p4m,
        Some(&franz),
        Some(&richland),
        "7",
    )
    .await?;
    db.set_config_value("max_daily_appointments", &p4m, Some(&franz), None, "40")
        .await?;
    summary.record("config_values", 4);

    info!(today = %format_date(today), "Seeded configurations demo data");
    Ok(summary)
}

struct DemoStory {
    story_id: &'static str,
    requirement_id: Option<&'static str>,
    title: &'static str,
    status: &'static str,
    priority: &'static str,
    category: &'static str,
    category_full: &'static str,
}

const PROP_STORIES: [DemoStory; 6] = [
    DemoStory {
        story_id: "PROP-AUTH-001",
        requirement_id: Some("PROP-REQ-001"),
        title: "Patient login with multi-factor authentication",
        status: "Approved",
        priority: "High",
        category: "AUTH",
        category_full: "Authentication",
    },
    DemoStory {
        story_id: "PROP-AUTH-002",
        requirement_id: Some("PROP-REQ-001"),
        title: "Password reset via email link",
        status: "Approved",
        priority: "Medium",
        category: "AUTH",
        category_full: "Authentication",
    },
    DemoStory {
        story_id: "PROP-SCHED-001",
        requirement_id: Some("PROP-REQ-002"),
        title: "Book an appointment online",
        status: "Pending Client Review",
        priority: "High",
        category: "SCHED",
        category_full: "Scheduling",
    },
    DemoStory {
        story_id: "PROP-SCHED-002",
        requirement_id: Some("PROP-REQ-002"),
        title: "Cancel an upcoming appointment",
        status: "Draft",
        priority: "Low",
        category: "SCHED",
        category_full: "Scheduling",
    },
    DemoStory {
        story_id: "PROP-LAB-001",
        requirement_id: Some("PROP-REQ-003"),
        title: "View released lab results",
        status: "Internal Review",
        priority: "High",
        category: "LAB",
        category_full: "Lab Results",
    },
    DemoStory {
        story_id: "PROP-MISC-001",
        requirement_id: None,
        title: "Accessibility audit fixes",
        status: "Deferred",
        priority: "Low",
        category: "MISC",
        category_full: "Miscellaneous",
    },
];

/// Populate the requirements database
///
/// # Errors
///
/// Returns an error if any insert fails, including when the demo rows
/// already exist
pub async fn seed_requirements(
    db: &RequirementsDatabase,
    today: NaiveDate,
) -> AppResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    let propel = db
        .create_client(
            "Propel Health",
            Some("Digital health programs for partner clinics"),
            Some("Dana Lee"),
            Some("dana.lee@propelhealth.example"),
        )
        .await?;
    let mercy = db
        .create_client("Mercy Health Partners", None, Some("Sam Patel"), None)
        .await?;
    let legacy = db
        .create_client("Legacy Care Group", Some("Former pilot partner"), None, None)
        .await?;
    sqlx::query("UPDATE clients SET status = 'Inactive' WHERE client_id = $1")
        .bind(&legacy)
        .execute(db.pool())
        .await?;
    summary.record("clients", 3);

    let prop = db
        .create_program(
            &propel,
            "Propel Patient Portal",
            "PROP",
            Some("Web Application"),
            Some("Patient-facing portal for scheduling and results"),
            Some("PROP_requirements.docx"),
        )
        .await?;
    let p4m = db
        .create_program(
            &propel,
            "Prevention4ME",
            "P4M",
            Some("Clinical Program"),
            None,
            None,
        )
        .await?;
    db.create_program(&mercy, "Genomics Reporting", "GRX", None, None, None)
        .await?;
    summary.record("programs", 3);

    let requirements = [
        (&prop, "PROP-REQ-001", Some("Secure login"), None),
        (&prop, "PROP-REQ-002", Some("Appointment scheduling"), None),
        (&prop, "PROP-REQ-003", Some("Lab results viewing"), None),
        (
            &prop,
            "PROP-REQ-004",
            None,
            Some("Patients can export their records as PDF for sharing with providers"),
        ),
        (&p4m, "P4M-REQ-001", Some("Risk assessment questionnaire"), None),
    ];
    for (program_id, requirement_id, title, description) in requirements {
        db.create_requirement(&Requirement {
            requirement_id: requirement_id.to_owned(),
            program_id: program_id.clone(),
            title: title.map(str::to_owned),
            description: description.map(str::to_owned),
            priority: Some("High".to_owned()),
            source: Some("Requirements workshop".to_owned()),
        })
        .await?;
    }
    summary.record("requirements", requirements.len());

    let created = format_date(today - Duration::days(60));
    for demo in &PROP_STORIES {
        let approved = demo.status == "Approved";
        db.create_story(&UserStory {
            story_id: demo.story_id.to_owned(),
            program_id: prop.clone(),
            requirement_id: demo.requirement_id.map(str::to_owned),
            title: Some(demo.title.to_owned()),
            user_story: Some(format!(
                "As a patient, I want to {}, so that I can manage my care online.",
                demo.title.to_lowercase()
            )),
            acceptance_criteria: Some(
                "Feature is reachable from the portal home page\n\nAction is recorded in the audit log\nErrors are shown inline"
                    .to_owned(),
            ),
            success_metrics: approved.then(|| "95% task completion in usability testing".to_owned()),
            priority: Some(demo.priority.to_owned()),
            category: Some(demo.category.to_owned()),
            category_full: Some(demo.category_full.to_owned()),
            status: demo.status.to_owned(),
            version: if approved { 2 } else { 1 },
            approved_date: approved.then(|| format_date(today - Duration::days(20))),
            approved_by: approved.then(|| "Dana Lee".to_owned()),
            created_date: Some(created.clone()),
            updated_date: Some(created.clone()),
        })
        .await?;
    }
    db.create_story(&UserStory {
        story_id: "P4M-RISK-001".to_owned(),
        program_id: p4m.clone(),
        requirement_id: Some("P4M-REQ-001".to_owned()),
        title: Some("Complete the hereditary risk questionnaire".to_owned()),
        user_story: None,
        acceptance_criteria: None,
        success_metrics: None,
        priority: Some("High".to_owned()),
        category: Some("RISK".to_owned()),
        category_full: Some("Risk Assessment".to_owned()),
        status: "Draft".to_owned(),
        version: 1,
        approved_date: None,
        approved_by: None,
        created_date: Some(created.clone()),
        updated_date: None,
    })
    .await?;
    summary.record("user_stories", PROP_STORIES.len() + 1);

    let tests = [
        ("PROP-AUTH-001-TC01", "PROP-AUTH-001", "Login with valid code", "happy_path", "Pass"),
        ("PROP-AUTH-001-TC02", "PROP-AUTH-001", "Login with expired code", "negative", "Fail"),
        ("PROP-AUTH-001-TC03", "PROP-AUTH-001", "Login during SMS outage", "edge_case", "Blocked"),
        ("PROP-SCHED-001-TC01", "PROP-SCHED-001", "Book first available slot", "happy_path", "Pass"),
        ("PROP-LAB-001-TC01", "PROP-LAB-001", "Unreleased results are hidden", "validation", "Not Run"),
    ];
    for (test_id, story_id, title, test_type, status) in tests {
        let executed = status == "Pass" || status == "Fail";
        db.create_test_case(&TestCase {
            test_id: test_id.to_owned(),
            program_id: prop.clone(),
            story_id: Some(story_id.to_owned()),
            title: Some(title.to_owned()),
            test_type: Some(test_type.to_owned()),
            test_status: status.to_owned(),
            test_steps: Some("1. Open the portal\n2. Follow the scenario".to_owned()),
            expected_results: Some("Outcome matches the acceptance criteria".to_owned()),
            tested_by: executed.then(|| "QA Team".to_owned()),
            tested_date: executed.then(|| format_date(today - Duration::days(3))),
        })
        .await?;
    }
    summary.record("uat_test_cases", tests.len());

    info!(today = %format_date(today), "Seeded requirements demo data");
    Ok(summary)
}
