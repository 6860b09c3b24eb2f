use crate::all::*;

// Image formats recognized when scanning the source image directory.
// Matching is case-sensitive, `photo.PNG` is skipped.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpeg", "jpg", "bmp"];

pub fn format_log(
  buf: &mut env_logger::fmt::Formatter,
  record: &log::Record,
) -> std::io::Result<()> {
  use std::io::Write;
  let mut style = buf.style();
  use env_logger::fmt::Color::*;
  use log::Level::*;
  style.set_color(match record.level() {
    Error => Red,
    Warn => Rgb(200, 200, 200),
    Info => Green,
    Debug => Magenta,
    Trace => Blue,
  });

  let s = format!("{:30}{}",
    format!("{}:{}",
      record.file().unwrap_or("?"),
      record.line().unwrap_or(0),
    ),
    record.args()
  );
  writeln!(buf, "{}", style.value(s))
}

// `foo.db` becomes a sibling `foo_new.db`. A name without the `.db` suffix
// gets `_new.db` appended whole.
pub fn new_db_path(path: &Path) -> PathBuf {
  let stem = path.file_stem().and_then(|s| s.to_str());
  let ext = path.extension().and_then(|s| s.to_str());
  match (stem, ext) {
    (Some(stem), Some("db")) => path.with_file_name(format!("{}_new.db", stem)),
    _ => {
      let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("database");
      path.with_file_name(format!("{}_new.db", name))
    },
  }
}

// Sorted filenames of the recognized images in `dir`. Subdirectories and
// other file types are skipped.
pub fn list_image_files(dir: &Path) -> Result<Vec<String>> {
  let mut names = vec![];
  for entry in fs::read_dir(dir)
    .context(format!("Failed to list image directory {}", dir.display()))?
  {
    let path = entry?.path();
    if !path.is_file() { continue }
    let ext = match path.extension().and_then(|e| e.to_str()) {
      Some(ext) => ext,
      None => continue,
    };
    if !IMAGE_EXTENSIONS.contains(&ext) { continue }
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
      names.push(name.to_string());
    }
  }
  names.sort();
  Ok(names)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_db_path() {
    assert_eq!(new_db_path(Path::new("/data/foo.db")), PathBuf::from("/data/foo_new.db"));
    assert_eq!(new_db_path(Path::new("foo.db")), PathBuf::from("foo_new.db"));
    assert_eq!(new_db_path(Path::new("/data/scan.sqlite")), PathBuf::from("/data/scan.sqlite_new.db"));
  }

  #[test]
  fn test_list_image_files() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.png", "a.jpg", "c.jpeg", "d.bmp", "e.PNG", "notes.txt", "f.tiff"] {
      fs::write(dir.path().join(name), []).unwrap();
    }
    fs::create_dir(dir.path().join("sub.png")).unwrap();

    let names = list_image_files(dir.path()).unwrap();
    assert_eq!(names, vec!["a.jpg", "b.png", "c.jpeg", "d.bmp"]);
  }

  #[test]
  fn test_list_image_files_missing_dir() {
    assert!(list_image_files(Path::new("/no/such/dir")).is_err());
  }
}
