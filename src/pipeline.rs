use crate::all::*;

// The whole pipeline: validate inputs, copy the database, load the reference
// poses and write them into the copy. The original database file is never
// modified. Returns the path of the copy.
pub fn add_pose_priors(
  path_db: &Path,
  path_model: &Path,
  path_images: &Path,
) -> Result<PathBuf> {
  for path in [path_db, path_model, path_images] {
    if !path.exists() {
      return Err(PriorError::MissingInput(path.to_path_buf()).into());
    }
  }

  let path_db_new = new_db_path(path_db);
  fs::copy(path_db, &path_db_new)
    .context(format!("Failed to copy database to {}", path_db_new.display()))?;

  match update_copy(&path_db_new, path_model, path_images) {
    Ok(()) => Ok(path_db_new),
    Err(err) => {
      // A failed run must not leave a half-updated copy behind.
      let _ = fs::remove_file(&path_db_new);
      Err(err)
    },
  }
}

fn update_copy(path_db_new: &Path, path_model: &Path, path_images: &Path) -> Result<()> {
  let model_images = read_model_images(path_model)
    .map_err(|err| PriorError::ModelRead(format!("{:#}", err)))?;
  let priors = PriorPoses::from_model(&model_images);
  info!("Loaded {} reference poses.", priors.len());

  let image_files = list_image_files(path_images)?;
  let mut db = Database::open(path_db_new)?;
  let rows = db.count_images()?;
  if image_files.len() != rows {
    return Err(PriorError::RowCountMismatch { images: image_files.len(), rows }.into());
  }

  let matched = db.write_priors(&priors)?;
  if matched < rows {
    warn!("{} of {} images have no reference pose.", rows - matched, rows);
  }
  info!("Updated {} image rows.", rows);
  db.close()?;
  Ok(())
}
