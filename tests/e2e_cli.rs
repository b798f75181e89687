use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

use cli_helpers::{base_cmd, ids, run_json, write_config};

#[test]
fn obligations_table_without_ansi_when_no_color() {
    let home = TempDir::new().unwrap();

    let mut cmd = base_cmd(&home);
    cmd.args(["obligations", "2024", "1", "--today", "2024-01-10"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("iva-mensual"))
        .stdout(predicate::str::contains("isr-provisional"))
        .stdout(predicate::str::contains("17/02/2024"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn obligations_json_for_resico_even_month() -> Result<()> {
    let home = TempDir::new()?;
    let json = run_json(
        &home,
        &["obligations", "2024", "2", "--regime", "resico", "--today", "2024-01-10"],
    )?;

    assert_eq!(ids(&json), vec!["pago-bimestral-resico"]);
    let obligation = &json[0];
    assert_eq!(obligation["periodicidad"], "bimestral");
    assert_eq!(obligation["regimen"], "resico");
    assert_eq!(obligation["fechaLimite"], "2024-03-17");
    // 2024-01-10 -> 2024-03-17: 21 + 29 + 17 days
    assert_eq!(obligation["diasRestantes"], 67);
    Ok(())
}

#[test]
fn upcoming_is_sorted_and_bounded() -> Result<()> {
    let home = TempDir::new()?;
    let json = run_json(&home, &["upcoming", "--days", "40", "--today", "2024-03-12"])?;

    assert_eq!(
        ids(&json),
        vec!["declaracion-anual-moral", "iva-mensual", "isr-provisional"]
    );
    let days: Vec<i64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["diasRestantes"].as_i64().unwrap())
        .collect();
    assert_eq!(days, vec![19, 36, 36]);
    Ok(())
}

#[test]
fn upcoming_uses_config_window() -> Result<()> {
    let home = TempDir::new()?;
    let config = write_config(&home, "horizon_days = 20\n")?;
    let json = run_json(
        &home,
        &[
            "--config",
            config.to_str().unwrap(),
            "upcoming",
            "--today",
            "2024-03-12",
        ],
    )?;

    assert_eq!(ids(&json), vec!["declaracion-anual-moral"]);
    Ok(())
}

#[test]
fn check_reports_plain_day() {
    let home = TempDir::new().unwrap();

    let mut cmd = base_cmd(&home);
    cmd.args(["check", "2024-01-05"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("05/01/2024 no es fecha límite"));
}

#[test]
fn check_json_lists_matching_obligations() -> Result<()> {
    let home = TempDir::new()?;
    let json = run_json(&home, &["check", "31/03/2024"])?;

    assert_eq!(json["fecha"], "2024-03-31");
    assert_eq!(json["esFechaLimite"], true);
    assert_eq!(ids(&json["obligaciones"]), vec!["declaracion-anual-moral"]);
    Ok(())
}

#[test]
fn stats_json_report() -> Result<()> {
    let home = TempDir::new()?;
    let json = run_json(&home, &["stats", "2024"])?;

    assert_eq!(json["año"], 2024);
    assert_eq!(json["totalObligaciones"], 25);
    assert_eq!(json["porMes"].as_object().unwrap().len(), 12);
    assert_eq!(json["porMes"]["3"], 3);
    assert_eq!(json["porTipo"]["declaracion"], 13);
    assert_eq!(json["porTipo"]["pago"], 12);
    assert_eq!(json["promedioMensual"], "2.08");
    Ok(())
}

#[test]
fn config_regime_applies_and_flag_overrides() -> Result<()> {
    let home = TempDir::new()?;
    write_config(&home, "regime = \"persona_fisica\"\n")?;

    let mut cmd = base_cmd(&home);
    cmd.env("CALENDARIO_FISCAL_CONFIG", home.path().join("config.toml"));
    cmd.args(["--json", "obligations", "2024", "4"]);
    let output = cmd.output()?;
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        ids(&json),
        vec!["pagos-provisionales-pf", "declaracion-anual-pf"]
    );
    assert_eq!(json[0]["personaTipo"], "fisica");

    let mut cmd = base_cmd(&home);
    cmd.env("CALENDARIO_FISCAL_CONFIG", home.path().join("config.toml"));
    cmd.args(["--json", "obligations", "2024", "4", "--regime", "general"]);
    let output = cmd.output()?;
    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(ids(&json), vec!["iva-mensual", "isr-provisional"]);
    Ok(())
}

#[test]
fn unknown_regime_fails_with_message() {
    let home = TempDir::new().unwrap();

    let mut cmd = base_cmd(&home);
    cmd.args(["obligations", "2024", "1", "--regime", "plataformas"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown regime 'plataformas'"));
}

#[test]
fn malformed_config_fails() -> Result<()> {
    let home = TempDir::new()?;
    let config = write_config(&home, "regime = 42\n")?;

    let mut cmd = base_cmd(&home);
    cmd.args(["--config", config.to_str().unwrap(), "stats", "2024"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
    Ok(())
}

#[test]
fn catalog_search_ignores_accents() -> Result<()> {
    let home = TempDir::new()?;
    let json = run_json(&home, &["catalog", "--search", "regimen simplificado"])?;

    assert_eq!(
        ids(&json),
        vec!["pago-bimestral-resico", "declaracion-anual-resico"]
    );
    Ok(())
}

#[test]
fn obligations_export_writes_csv() -> Result<()> {
    let home = TempDir::new()?;
    let csv_path = home.path().join("marzo.csv");

    let mut cmd = base_cmd(&home);
    cmd.args([
        "obligations",
        "2024",
        "3",
        "--today",
        "2024-03-01",
        "--export",
        csv_path.to_str().unwrap(),
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 obligation(s)"));

    let content = std::fs::read_to_string(&csv_path)?;
    assert!(content.starts_with("id,nombre,tipo,forma,fechaLimite"));
    assert!(content.contains("declaracion-anual-moral,Declaración Anual Personas Morales,declaracion,A-2,2024-03-31,general,anual,moral,30"));
    Ok(())
}
