use crate::error::{Error, ExtractionError};
use crate::extraction::*;
use crate::types::ArchiveType;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a valid ZIP archive containing the given files
fn create_zip_archive(archive_path: &Path, files: &[(&str, &[u8])]) {
    let file = std::fs::File::create(archive_path).unwrap();
    let mut writer = ::zip::ZipWriter::new(file);
    let options =
        ::zip::write::FileOptions::default().compression_method(::zip::CompressionMethod::Stored);
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        std::io::Write::write_all(&mut writer, content).unwrap();
    }
    writer.finish().unwrap();
}

/// Stored (uncompressed) RAR 4 archive: `planilla.xlsx`, `docs/pliego_bases.pdf`
const RAR_WITH_PBC: &[u8] = b"Rar!\x1a\x07\x00\xcf\x90s\x00\x00\x0d\x00\x00\x00\x00\x00\x00\x00\
\xe9\xc7t\x00\x80-\x00\x04\x00\x00\x00\x04\x00\x00\x00\x03\x10\xb6\xce\x94\x00\x00!X\x140\x0d\x00\xa4\x81\x00\x00\
planilla.xlsxxlsx\
^xt\x00\x805\x00\x0f\x00\x00\x00\x0f\x00\x00\x00\x03\xd8\x10\xa3\x0f\x00\x00!X\x140\x15\x00\xa4\x81\x00\x00\
docs/pliego_bases.pdf%PDF-1.4 pliego\
\xc4={\x00@\x07\x00";

/// Stored RAR 4 archive: `planilla.xlsx`, `anexo.pdf`
const RAR_WITHOUT_PBC: &[u8] = b"Rar!\x1a\x07\x00\xcf\x90s\x00\x00\x0d\x00\x00\x00\x00\x00\x00\x00\
\xe9\xc7t\x00\x80-\x00\x04\x00\x00\x00\x04\x00\x00\x00\x03\x10\xb6\xce\x94\x00\x00!X\x140\x0d\x00\xa4\x81\x00\x00\
planilla.xlsxxlsx\
/Ut\x00\x80)\x00\x0e\x00\x00\x00\x0e\x00\x00\x00\x03\xf3\xf7\xa7\xa3\x00\x00!X\x140\x09\x00\xa4\x81\x00\x00\
anexo.pdf%PDF-1.4 anexo\
\xc4={\x00@\x07\x00";

/// Stored RAR 4 archive with a single `../carta_invitacion.pdf` entry
const RAR_WITH_TRAVERSAL: &[u8] = b"Rar!\x1a\x07\x00\xcf\x90s\x00\x00\x0d\x00\x00\x00\x00\x00\x00\x00\
\xc1\xaat\x00\x807\x00\x0e\x00\x00\x00\x0e\x00\x00\x00\x03;c`\xd3\x00\x00!X\x140\x17\x00\xa4\x81\x00\x00\
../carta_invitacion.pdf%PDF-1.4 carta\
\xc4={\x00@\x07\x00";

/// Write a fixture archive into `dir`
fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn expect_extraction_error(err: Error) -> ExtractionError {
    match err {
        Error::Extraction(e) => e,
        other => panic!("expected extraction error, got: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Archive type detection
// ---------------------------------------------------------------------------

#[test]
fn test_detect_archive_type_zip_and_rar() {
    assert_eq!(
        detect_archive_type(Path::new("documentos.zip")),
        Some(ArchiveType::Zip)
    );
    assert_eq!(
        detect_archive_type(Path::new("/tmp/x/documentos.rar")),
        Some(ArchiveType::Rar)
    );
}

#[test]
fn test_detect_archive_type_case_insensitive() {
    assert_eq!(
        detect_archive_type(Path::new("DOCS.ZIP")),
        Some(ArchiveType::Zip)
    );
    assert_eq!(
        detect_archive_type(Path::new("Docs.Rar")),
        Some(ArchiveType::Rar)
    );
}

#[test]
fn test_detect_archive_type_unknown() {
    assert_eq!(detect_archive_type(Path::new("pliego.pdf")), None);
    assert_eq!(detect_archive_type(Path::new("archive.7z")), None);
    assert_eq!(detect_archive_type(Path::new("no_extension")), None);
}

// ---------------------------------------------------------------------------
// ZIP
// ---------------------------------------------------------------------------

#[test]
fn zip_extracts_pbc_document() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("documentos_pbc.zip");
    create_zip_archive(
        &archive,
        &[
            ("planilla_precios.xlsx", b"xlsx"),
            ("pliego_bases_condiciones.docx", b"docx content"),
        ],
    );
    let dest = temp.path().join("out");

    let extracted = ZipExtractor::find_and_extract(&archive, &dest).unwrap();

    assert_eq!(extracted, dest.join("pliego_bases_condiciones.docx"));
    assert_eq!(std::fs::read(&extracted).unwrap(), b"docx content");
}

#[test]
fn zip_extracts_invitation_letter() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("documentos_carta.zip");
    create_zip_archive(
        &archive,
        &[
            ("anexo_tecnico.pdf", b"anexo"),
            ("carta_invitacion.docx", b"carta"),
        ],
    );

    let extracted = ZipExtractor::find_and_extract(&archive, temp.path()).unwrap();

    assert!(extracted.ends_with("carta_invitacion.docx"));
    assert!(extracted.exists());
}

#[test]
fn zip_picks_first_matching_entry_in_archive_order() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("docs.zip");
    create_zip_archive(
        &archive,
        &[
            ("carta_invitacion.pdf", b"first"),
            ("pliego_bases_condiciones.pdf", b"second"),
        ],
    );

    let extracted = ZipExtractor::find_and_extract(&archive, temp.path()).unwrap();
    assert_eq!(std::fs::read(&extracted).unwrap(), b"first");
}

#[test]
fn zip_matches_on_base_name_and_keeps_inner_directories() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("docs.zip");
    create_zip_archive(
        &archive,
        &[
            // Directory name contains a keyword but the file does not
            ("pliego/indice.txt", b"index"),
            ("licitacion/PBC_Obra.PDF", b"pdf"),
        ],
    );
    let dest = temp.path().join("out");

    let extracted = ZipExtractor::find_and_extract(&archive, &dest).unwrap();

    assert_eq!(extracted, dest.join("licitacion").join("PBC_Obra.PDF"));
    assert_eq!(std::fs::read(&extracted).unwrap(), b"pdf");
}

#[test]
fn zip_without_matching_document_is_not_found() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("documentos_sin_pbc.zip");
    create_zip_archive(
        &archive,
        &[
            ("planilla_precios.xlsx", b"xlsx"),
            ("docs/anexo.pdf", b"anexo"),
            ("pliego_bases_condiciones.zip", b"nested"),
        ],
    );

    let err = ZipExtractor::find_and_extract(&archive, temp.path()).unwrap_err();
    assert!(err.is_not_found());
    assert!(
        err.to_string()
            .contains("no PBC or invitation letter found in ZIP archive")
    );

    match expect_extraction_error(err) {
        ExtractionError::NoMatchingDocument { available, .. } => {
            assert_eq!(
                available,
                vec![
                    "planilla_precios.xlsx",
                    "anexo.pdf",
                    "pliego_bases_condiciones.zip"
                ]
            );
        }
        other => panic!("expected NoMatchingDocument, got: {other:?}"),
    }
}

#[test]
fn zip_entry_escaping_destination_is_sanitized() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("evil.zip");
    create_zip_archive(
        &archive,
        &[("../pliego.pdf", b"escape"), ("/abs/carta.pdf", b"abs")],
    );
    let dest = temp.path().join("out");

    let extracted = ZipExtractor::find_and_extract(&archive, &dest).unwrap();

    assert_eq!(extracted, dest.join("pliego.pdf"));
    assert_eq!(std::fs::read(&extracted).unwrap(), b"escape");
    assert!(!temp.path().join("pliego.pdf").exists());
}

#[test]
fn zip_absolute_entry_stays_under_destination() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("abs.zip");
    create_zip_archive(&archive, &[("/abs/carta_invitacion.pdf", b"abs")]);
    let dest = temp.path().join("out");

    let extracted = ZipExtractor::find_and_extract(&archive, &dest).unwrap();

    assert_eq!(extracted, dest.join("abs").join("carta_invitacion.pdf"));
}

#[test]
fn zip_empty_archive() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("empty.zip");
    create_zip_archive(&archive, &[]);

    let err = ZipExtractor::find_and_extract(&archive, temp.path()).unwrap_err();
    assert!(matches!(
        expect_extraction_error(err),
        ExtractionError::EmptyArchive { format: "ZIP", .. }
    ));
}

#[test]
fn zip_missing_archive() {
    let temp = TempDir::new().unwrap();

    let err = ZipExtractor::find_and_extract(Path::new("/path/nonexistent.zip"), temp.path())
        .unwrap_err();

    assert!(err.to_string().contains("ZIP archive does not exist"));
    assert!(matches!(
        expect_extraction_error(err),
        ExtractionError::ArchiveNotFound { .. }
    ));
}

#[test]
fn zip_rejects_non_zip_file() {
    let temp = TempDir::new().unwrap();
    let fake = temp.path().join("pliego_bases_condiciones.zip");
    std::fs::write(&fake, b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF\n").unwrap();

    let err = ZipExtractor::find_and_extract(&fake, temp.path()).unwrap_err();

    assert!(err.to_string().contains("not a valid ZIP archive"));
    assert!(!err.is_not_found());
}

#[test]
fn zip_unreadable_path_is_an_extraction_error() {
    let temp = TempDir::new().unwrap();
    let dir_archive = temp.path().join("carpeta.zip");
    std::fs::create_dir(&dir_archive).unwrap();

    let err = ZipExtractor::find_and_extract(&dir_archive, temp.path()).unwrap_err();
    assert!(matches!(
        expect_extraction_error(err),
        ExtractionError::InvalidArchive { format: "ZIP", .. }
    ));
}

#[cfg(unix)]
#[test]
fn zip_permission_denied_is_an_extraction_error() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("docs.zip");
    create_zip_archive(&archive, &[("pliego.pdf", b"pdf")]);
    std::fs::set_permissions(&archive, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can open the file regardless of mode bits
    if std::fs::File::open(&archive).is_ok() {
        return;
    }

    let err = ZipExtractor::find_and_extract(&archive, temp.path()).unwrap_err();
    assert!(err.to_string().contains("cannot open archive"));
    assert!(matches!(
        expect_extraction_error(err),
        ExtractionError::InvalidArchive { format: "ZIP", .. }
    ));
}

// ---------------------------------------------------------------------------
// RAR
// ---------------------------------------------------------------------------

#[test]
fn rar_extracts_pbc_keeping_inner_directories() {
    let temp = TempDir::new().unwrap();
    let archive = write_fixture(temp.path(), "documentos.rar", RAR_WITH_PBC);
    let dest = temp.path().join("out");

    let extracted = RarExtractor::find_and_extract(&archive, &dest).unwrap();

    assert_eq!(extracted, dest.join("docs").join("pliego_bases.pdf"));
    assert_eq!(std::fs::read(&extracted).unwrap(), b"%PDF-1.4 pliego");
    assert!(!dest.join("planilla.xlsx").exists());
}

#[test]
fn rar_without_matching_document_is_not_found() {
    let temp = TempDir::new().unwrap();
    let archive = write_fixture(temp.path(), "documentos.rar", RAR_WITHOUT_PBC);

    let err = RarExtractor::find_and_extract(&archive, temp.path()).unwrap_err();
    assert!(err.is_not_found());
    assert!(
        err.to_string()
            .contains("no PBC or invitation letter found in RAR archive")
    );

    match expect_extraction_error(err) {
        ExtractionError::NoMatchingDocument { available, .. } => {
            assert_eq!(available, vec!["planilla.xlsx", "anexo.pdf"]);
        }
        other => panic!("expected NoMatchingDocument, got: {other:?}"),
    }
}

#[test]
fn rar_and_zip_sanitize_traversal_the_same_way() {
    let temp = TempDir::new().unwrap();
    let rar = write_fixture(temp.path(), "evil.rar", RAR_WITH_TRAVERSAL);
    let zip = temp.path().join("evil.zip");
    create_zip_archive(&zip, &[("../carta_invitacion.pdf", b"%PDF-1.4 carta")]);

    let from_rar = RarExtractor::find_and_extract(&rar, &temp.path().join("rar")).unwrap();
    let from_zip = ZipExtractor::find_and_extract(&zip, &temp.path().join("zip")).unwrap();

    assert_eq!(from_rar, temp.path().join("rar").join("carta_invitacion.pdf"));
    assert_eq!(from_zip, temp.path().join("zip").join("carta_invitacion.pdf"));
    assert_eq!(std::fs::read(from_rar).unwrap(), std::fs::read(from_zip).unwrap());
    assert!(!temp.path().join("carta_invitacion.pdf").exists());
}

#[test]
fn rar_missing_archive() {
    let temp = TempDir::new().unwrap();

    let err = RarExtractor::find_and_extract(Path::new("/path/nonexistent.rar"), temp.path())
        .unwrap_err();

    assert!(err.to_string().contains("RAR archive does not exist"));
}

#[test]
fn rar_rejects_non_rar_file() {
    let temp = TempDir::new().unwrap();
    let fake = temp.path().join("pliego_bases_condiciones.rar");
    std::fs::write(&fake, b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF\n").unwrap();

    let err = RarExtractor::find_and_extract(&fake, temp.path()).unwrap_err();

    assert!(matches!(
        expect_extraction_error(err),
        ExtractionError::InvalidArchive { format: "RAR", .. }
    ));
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

#[tokio::test]
async fn extract_document_unknown_type() {
    let err = extract_document(Path::new("pliego.txt"), Path::new("/tmp/extract"))
        .await
        .unwrap_err();

    match err {
        Error::UnsupportedFormat(reason) => assert!(reason.contains("unknown archive type")),
        other => panic!("expected UnsupportedFormat, got: {other:?}"),
    }
}

#[tokio::test]
async fn extract_document_routes_uppercase_extensions() {
    let temp = TempDir::new().unwrap();

    // Files don't exist, but routing must reach the right extractor
    let err = extract_document(&temp.path().join("DOCS.ZIP"), temp.path())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ZIP archive does not exist"));

    let err = extract_document(&temp.path().join("DOCS.RAR"), temp.path())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("RAR archive does not exist"));
}

#[tokio::test]
async fn extract_document_from_rar() {
    let temp = TempDir::new().unwrap();
    let archive = write_fixture(temp.path(), "DOCUMENTOS.RAR", RAR_WITH_PBC);
    let dest = temp.path().join("extracted");

    let extracted = extract_document(&archive, &dest).await.unwrap();

    assert_eq!(extracted, dest.join("docs").join("pliego_bases.pdf"));
}

#[tokio::test]
async fn extract_document_from_zip() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("docs.zip");
    create_zip_archive(&archive, &[("carta_invitación.pdf", b"carta")]);
    let dest = temp.path().join("extracted");

    let extracted = extract_document(&archive, &dest).await.unwrap();

    assert_eq!(extracted, dest.join("carta_invitación.pdf"));
    assert_eq!(std::fs::read(extracted).unwrap(), b"carta");
}
