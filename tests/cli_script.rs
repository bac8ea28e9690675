use std::path::Path;

use assert_cmd::Command;
use assert_fs::{prelude::*, TempDir};
use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;

fn script(home: &Path, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("formwright_cli")
        .unwrap()
        .env("FORMWRIGHT_CLI_SCRIPT", "1")
        .env("FORMWRIGHT_HOME", home)
        .env("NO_COLOR", "1")
        .write_stdin(input)
        .assert()
}

fn saved_forms(home: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(home.join("savedForms.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn script_mode_saves_a_template_form() {
    let home = TempDir::new().unwrap();
    let assert = script(
        home.path(),
        "template contact-form\nname Support Request\nsave\nforms\nexit\n",
    )
    .success()
    .stdout(contains("Form saved: Support Request"));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let link = Regex::new(r"Share link: https://formwright\.app/form/([0-9a-f]{10})").unwrap();
    let captures = link.captures(&stdout).expect("share link printed");
    let shareable = &captures[1];

    let forms = saved_forms(home.path());
    assert_eq!(forms.as_array().unwrap().len(), 1);
    assert_eq!(forms[0]["name"], "Support Request");
    assert_eq!(forms[0]["shareableId"], shareable);
    assert_eq!(forms[0]["fields"].as_array().unwrap().len(), 4);
    home.child("draftForm.json").assert(predicate::path::missing());
}

#[test]
fn draft_survives_between_runs() {
    let home = TempDir::new().unwrap();
    script(home.path(), "name Quarterly Check-in\nadd text\nadd email 1\nexit\n").success();
    home.child("draftForm.json").assert(predicate::path::exists());

    script(home.path(), "show\nexit\n")
        .success()
        .stdout(contains("Draft restored - last edited"))
        .stdout(contains("Quarterly Check-in (2 fields, 1 step)"));
}

#[test]
fn submit_records_a_response() {
    let home = TempDir::new().unwrap();
    script(home.path(), "template contact-form\nsave\nexit\n").success();
    let id = saved_forms(home.path())[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    script(
        home.path(),
        &format!(
            "submit {id} Name=Ada \"Email Address=ada@example.com\" Subject=Hello \"Message=Hi there\"\n\
             responses {id}\nexit\n"
        ),
    )
    .success()
    .stdout(contains("Your response has been recorded"))
    .stdout(contains("Responses (1)"))
    .stdout(contains("Email Address: ada@example.com"));

    assert_eq!(saved_forms(home.path())[0]["responses"], 1);
}

#[test]
fn incomplete_submission_is_blocked() {
    let home = TempDir::new().unwrap();
    script(home.path(), "template contact-form\nsave\nexit\n").success();
    let id = saved_forms(home.path())[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    script(
        home.path(),
        &format!("submit {id} Name=Ada \"Email Address=ada@example.com\"\nexit\n"),
    )
    .success()
    .stdout(contains("Subject is required"))
    .stdout(contains("Message is required"))
    .stdout(contains("recorded").not());
    home.child("formResponses.json")
        .assert(predicate::path::missing());
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = TempDir::new().unwrap();
    script(home.path(), "sav\nexit\n")
        .success()
        .stdout(contains("Unknown command `sav`"))
        .stdout(contains("Did you mean `save`?"));
}

#[test]
fn saving_an_empty_form_is_reported() {
    let home = TempDir::new().unwrap();
    script(home.path(), "save\nexit\n")
        .success()
        .stdout(contains("Try `add text`"));
    home.child("savedForms.json").assert(predicate::path::missing());
}

#[test]
fn config_changes_are_persisted() {
    let home = TempDir::new().unwrap();
    script(
        home.path(),
        "config share_base_url https://forms.example.org/f/\nconfig share_base_url\nexit\n",
    )
    .success()
    .stdout(contains("share_base_url = https://forms.example.org/f"));

    home.child("config.json")
        .assert(contains("https://forms.example.org/f"));
}
