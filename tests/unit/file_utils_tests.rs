/*!
 * Tests for file and directory utilities
 */

use std::fs;

use readalong::file_utils::FileManager;
use tempfile::TempDir;

/// Test existence checks distinguish files from directories
#[test]
fn test_exists_withFileAndDir_shouldDistinguish() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, "x").unwrap();

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(dir.path()));
    assert!(FileManager::dir_exists(dir.path()));
    assert!(!FileManager::dir_exists(&file));
}

/// Test recursive search by extension, case-insensitive
#[test]
fn test_find_files_withMixedExtensions_shouldFilterCaseInsensitively() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("page1.xhtml"), "x").unwrap();
    fs::write(dir.path().join("nested").join("page2.XHTML"), "x").unwrap();
    fs::write(dir.path().join("style.css"), "x").unwrap();

    let found = FileManager::find_files(dir.path(), "xhtml").unwrap();
    assert_eq!(found.len(), 2);
}

/// Test stem extraction from found files
#[test]
fn test_find_file_stems_withFiles_shouldReturnStems() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("page1.xhtml"), "x").unwrap();
    fs::write(dir.path().join("cover.xhtml"), "x").unwrap();

    let mut stems = FileManager::find_file_stems(dir.path(), ".xhtml").unwrap();
    stems.sort();
    assert_eq!(stems, vec!["cover", "page1"]);
}

/// Test write creates missing parent directories
#[test]
fn test_write_to_file_withMissingParents_shouldCreateThem() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a").join("b").join("out.txt");

    FileManager::write_to_file(&path, "content").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "content");
}

/// Test copy into a directory that does not exist yet
#[test]
fn test_copy_file_withMissingTargetDir_shouldCreateIt() {
    let dir = TempDir::new().unwrap();
    let from = dir.path().join("src.bin");
    let to = dir.path().join("out").join("dst.bin");
    fs::write(&from, b"payload").unwrap();

    FileManager::copy_file(&from, &to).unwrap();
    assert_eq!(fs::read(&to).unwrap(), b"payload");
}

/// Test copy of a missing source fails
#[test]
fn test_copy_file_withMissingSource_shouldFail() {
    let dir = TempDir::new().unwrap();
    let result = FileManager::copy_file(dir.path().join("absent"), dir.path().join("dst"));
    assert!(result.is_err());
}

/// Test append separates old and new content with a newline
#[test]
fn test_append_with_newline_withExistingFile_shouldSeparateContent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("style.css");
    fs::write(&path, "body { margin: 0; }").unwrap();

    FileManager::append_with_newline(&path, ".hl { background: yellow; }").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, "body { margin: 0; }\n.hl { background: yellow; }");
}

/// Test append creates the file when missing
#[test]
fn test_append_with_newline_withMissingFile_shouldCreateIt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh.css");

    FileManager::append_with_newline(&path, ".hl {}").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "\n.hl {}");
}
