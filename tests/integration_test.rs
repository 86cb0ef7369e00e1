use calamine::{Data, Reader, Xlsx, open_workbook};
use cercatore::{CercatoreConfig, ExcludeMode, RiskLevel, ScanOutcome, run, run_scan};
use image::{ImageBuffer, Rgb};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn config(root: &Path, output: &Path) -> CercatoreConfig {
    CercatoreConfig {
        path: root.to_path_buf(),
        output: output.to_path_buf(),
        quiet: true,
        ..Default::default()
    }
}

fn report_dirs(output: &Path) -> Vec<PathBuf> {
    fs::read_dir(output)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir() && p.file_name().unwrap().to_string_lossy().starts_with("report_"))
        .collect()
}

fn table_rows(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    range
        .rows()
        .skip(1)
        .map(|r| {
            r.iter()
                .map(|c| match c {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_end_to_end_scan() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    let root = temp_dir.path();

    fs::write(root.join("a.txt"), "contact: joe@example.com")?;
    fs::write(root.join("b.pdf"), "this is not really a pdf")?;
    fs::write(root.join("notes.md"), "joe@example.com")?;

    let outcome = run(config(root, out_dir.path()))?;

    let artifacts = outcome.artifacts().expect("report expected");
    assert_eq!(report_dirs(out_dir.path()), vec![artifacts.dir.clone()]);
    assert!(artifacts.table.exists());
    assert!(artifacts.narrative.exists());
    assert!(artifacts.dir.join("rischi.svg").exists());
    assert!(artifacts.dir.join("sensibili.svg").exists());

    let rows = table_rows(&artifacts.table);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], root.join("a.txt").display().to_string());
    assert_eq!(rows[0][1], "Email");
    assert_eq!(rows[0][3], "Medio");
    assert_eq!(rows[1][0], root.join("b.pdf").display().to_string());
    assert_eq!(rows[1][1], "");
    assert_eq!(rows[1][3], "NonClassificato");

    let stats = outcome.stats();
    assert_eq!(stats.files_discovered, 2);
    assert_eq!(stats.files_reported, 2);
    assert_eq!(stats.extraction_failures, 1);

    Ok(())
}

#[test]
fn test_oversized_files_produce_no_report() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("big.txt"), "IBAN IT60X0542811101000000123456")?;

    let outcome = run_scan(
        &CercatoreConfig {
            max_size_mb: 0,
            ..config(temp_dir.path(), out_dir.path())
        },
        None,
    )?;

    assert!(matches!(outcome, ScanOutcome::NoData { .. }));
    assert!(report_dirs(out_dir.path()).is_empty());
    Ok(())
}

#[test]
fn test_high_tier_wins_and_keeps_all_tags() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    fs::write(
        temp_dir.path().join("cliente.txt"),
        "mario@example.com IBAN IT60X0542811101000000123456",
    )?;

    let outcome = run_scan(&config(temp_dir.path(), out_dir.path()), None)?;
    let rows = table_rows(&outcome.artifacts().unwrap().table);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "Email, IBAN");
    assert_eq!(rows[0][3], RiskLevel::Alto.as_str());
    Ok(())
}

#[test]
fn test_content_filter_drops_non_matching_files() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::write(root.join("fattura.txt"), "Fattura n. 12 per mario@example.com")?;
    fs::write(root.join("lettera.txt"), "Gentile cliente, mario@example.com")?;

    let outcome = run_scan(
        &CercatoreConfig {
            search: Some("fattura".to_string()),
            ..config(root, out_dir.path())
        },
        None,
    )?;

    let rows = table_rows(&outcome.artifacts().unwrap().table);
    assert_eq!(rows.len(), 1);
    assert!(rows[0][0].ends_with("fattura.txt"));
    assert_eq!(outcome.stats().files_filtered, 1);
    Ok(())
}

#[test]
fn test_filter_matching_nothing_creates_no_directory() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("a.txt"), "nulla da vedere")?;

    let outcome = run_scan(
        &CercatoreConfig {
            search: Some("contratto".to_string()),
            ..config(temp_dir.path(), out_dir.path())
        },
        None,
    )?;

    assert!(outcome.artifacts().is_none());
    assert!(report_dirs(out_dir.path()).is_empty());
    Ok(())
}

#[test]
fn test_untagged_run_skips_tag_chart() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("a.txt"), "nulla da vedere")?;

    let outcome = run_scan(&config(temp_dir.path(), out_dir.path()), None)?;
    let artifacts = outcome.artifacts().unwrap();

    assert!(artifacts.dir.join("rischi.svg").exists());
    assert!(!artifacts.dir.join("sensibili.svg").exists());
    Ok(())
}

#[test]
fn test_excluded_folders() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("Windows/System32"))?;
    fs::create_dir_all(root.join("OldWindowsBackup"))?;
    fs::write(root.join("Windows/System32/log.txt"), "x@example.com")?;
    fs::write(root.join("OldWindowsBackup/old.txt"), "x@example.com")?;
    fs::write(root.join("keep.txt"), "x@example.com")?;

    let substring = run_scan(&config(root, out_dir.path()), None)?;
    assert_eq!(substring.stats().files_discovered, 1);

    let segment = run_scan(
        &CercatoreConfig {
            exclude_mode: ExcludeMode::Segment,
            ..config(root, out_dir.path())
        },
        None,
    )?;
    assert_eq!(segment.stats().files_discovered, 2);
    Ok(())
}

#[test]
fn test_office_documents_through_pipeline() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    let root = temp_dir.path();

    let docx = root.join("referto.docx");
    let mut writer = zip::ZipWriter::new(fs::File::create(&docx)?);
    writer.start_file("word/document.xml", zip::write::SimpleFileOptions::default())?;
    writer.write_all(
        br#"<w:document><w:body><w:p><w:r><w:t>Diagnosi: asma</w:t></w:r></w:p></w:body></w:document>"#,
    )?;
    writer.finish()?;

    let xlsx = root.join("iscritti.xlsx");
    let mut workbook = rust_xlsxwriter::Workbook::new();
    workbook.add_worksheet().write_string(0, 0, "iscritto al sindacato")?;
    workbook.save(&xlsx)?;

    let outcome = run_scan(&config(root, out_dir.path()), None)?;
    let rows = table_rows(&outcome.artifacts().unwrap().table);

    assert_eq!(rows.len(), 2);
    assert!(rows[0][0].ends_with("iscritti.xlsx"));
    assert_eq!(rows[0][1], "Sindacati");
    assert_eq!(rows[0][3], "Medio");
    assert!(rows[1][0].ends_with("referto.docx"));
    assert_eq!(rows[1][1], "Termini sanitari");
    assert_eq!(rows[1][3], "Alto");
    Ok(())
}

#[test]
fn test_image_without_ocr_is_still_reported() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    let img_path = temp_dir.path().join("scansione.png");
    ImageBuffer::from_pixel(100, 50, Rgb([255u8, 0, 0])).save(&img_path)?;

    let outcome = run_scan(
        &CercatoreConfig {
            ocr_command: "cercatore-missing-ocr-binary".to_string(),
            ..config(temp_dir.path(), out_dir.path())
        },
        None,
    )?;

    let rows = table_rows(&outcome.artifacts().unwrap().table);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "");
    assert_eq!(rows[0][3], "NonClassificato");
    assert_eq!(outcome.stats().extraction_failures, 1);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_dangling_link_gets_no_row() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::write(root.join("real.txt"), "contact: joe@example.com")?;
    std::os::unix::fs::symlink(root.join("gone.txt"), root.join("ghost.txt"))?;

    let outcome = run_scan(&config(root, out_dir.path()), None)?;
    let rows = table_rows(&outcome.artifacts().unwrap().table);

    assert_eq!(rows.len(), 1);
    assert!(rows[0][0].ends_with("real.txt"));
    assert_eq!(outcome.stats().files_discovered, 1);
    assert_eq!(outcome.stats().extraction_failures, 0);
    Ok(())
}

#[test]
fn test_docx_text_box_and_character_references() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    let docx = temp_dir.path().join("modulo.docx");

    let mut writer = zip::ZipWriter::new(fs::File::create(&docx)?);
    writer.start_file("word/document.xml", zip::write::SimpleFileOptions::default())?;
    writer.write_all(
        concat!(
            "<w:document><w:body><w:p><w:r><w:t>Contatto mario&#64;example.com</w:t></w:r>",
            "<w:r><w:drawing><wps:txbx><w:txbxContent><w:p><w:r><w:t>Nota</w:t></w:r></w:p>",
            "</w:txbxContent></wps:txbx></w:drawing></w:r>",
            "<w:r><w:t> IBAN IT60X0542811101000000123456</w:t></w:r></w:p></w:body></w:document>",
        )
        .as_bytes(),
    )?;
    writer.finish()?;

    let outcome = run_scan(&config(temp_dir.path(), out_dir.path()), None)?;
    let rows = table_rows(&outcome.artifacts().unwrap().table);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "Email, IBAN");
    assert_eq!(rows[0][3], "Alto");
    Ok(())
}

#[test]
fn test_parallel_run_keeps_discovery_order() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    let root = temp_dir.path();
    for i in 0..25 {
        fs::write(root.join(format!("doc_{i:02}.txt")), format!("utente{i}@example.com"))?;
    }

    let outcome = run_scan(
        &CercatoreConfig {
            jobs: 4,
            ..config(root, out_dir.path())
        },
        None,
    )?;

    let files: Vec<String> = table_rows(&outcome.artifacts().unwrap().table)
        .into_iter()
        .map(|r| r[0].clone())
        .collect();
    let expected: Vec<String> = (0..25)
        .map(|i| root.join(format!("doc_{i:02}.txt")).display().to_string())
        .collect();
    assert_eq!(files, expected);
    Ok(())
}

#[test]
fn test_invalid_search_pattern_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let result = run_scan(
        &CercatoreConfig {
            search: Some("[unclosed".to_string()),
            ..config(temp_dir.path(), out_dir.path())
        },
        None,
    );
    assert!(result.is_err());
    assert!(report_dirs(out_dir.path()).is_empty());
}
