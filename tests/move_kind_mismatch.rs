use assert_fs::prelude::*;
use scratchpath::{Error, TempDir, TempFile};

#[test]
fn file_onto_existing_directory_is_rejected() {
    let fixture = assert_fs::TempDir::new().unwrap();
    let occupied = fixture.child("occupied");
    occupied.create_dir_all().unwrap();

    let mut f = TempFile::new_in(fixture.path(), "src").unwrap();
    f.write(b"keep me").unwrap();
    let original = f.path().unwrap().to_path_buf();

    let err = f.persist_to(occupied.path()).unwrap_err();

    assert!(matches!(err, Error::DestinationIsDirectory { .. }), "got {err:?}");
    assert_eq!(f.path(), Some(original.as_path()), "handle must keep owning");
    assert_eq!(f.read().unwrap(), b"keep me", "source must be untouched");
    assert!(occupied.path().is_dir());
}

#[test]
fn directory_onto_existing_file_is_rejected() {
    let fixture = assert_fs::TempDir::new().unwrap();
    let occupied = fixture.child("taken.txt");
    occupied.write_str("incumbent").unwrap();

    let mut d = TempDir::new_in(fixture.path(), "src").unwrap();
    std::fs::write(d.join("payload.txt").unwrap(), b"tree").unwrap();
    let original = d.path().unwrap().to_path_buf();

    let err = d.persist_to(occupied.path()).unwrap_err();

    assert!(matches!(err, Error::DestinationNotDirectory { .. }), "got {err:?}");
    assert_eq!(d.path(), Some(original.as_path()));
    assert!(original.join("payload.txt").exists());
    occupied.assert("incumbent");
}

#[test]
fn mismatch_errors_carry_no_os_code() {
    let fixture = assert_fs::TempDir::new().unwrap();
    fixture.child("dir").create_dir_all().unwrap();

    let mut f = TempFile::new_in(fixture.path(), "src").unwrap();
    let err = f.persist_to(fixture.child("dir").path()).unwrap_err();

    assert_eq!(err.raw_os_error(), None);
}
