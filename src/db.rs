use crate::all::*;

use rusqlite::{params, Connection, OpenFlags};

// The copied reconstruction database. Only the `images` table is touched:
// rows are read as (image_id, name, camera_id) and their eight prior-pose
// columns written back.
pub struct Database {
  conn: Connection,
}

pub struct ImageRow {
  pub image_id: i64,
  pub name: String,
  pub camera_id: i64,
}

impl Database {
  // The file must already exist, opening never creates a new database.
  pub fn open(path: &Path) -> Result<Database, PriorError> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
    Ok(Database { conn })
  }

  pub fn count_images(&self) -> Result<usize, PriorError> {
    let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
    Ok(count as usize)
  }

  pub fn image_rows(&self) -> Result<Vec<ImageRow>, PriorError> {
    let mut stmt = self.conn.prepare("SELECT image_id, name, camera_id FROM images")?;
    let rows = stmt
      .query_map([], |row| {
        Ok(ImageRow {
          image_id: row.get(0)?,
          name: row.get(1)?,
          camera_id: row.get(2)?,
        })
      })?
      .collect::<Result<Vec<_>, rusqlite::Error>>()?;
    Ok(rows)
  }

  // Writes every row's prior pose inside one transaction; nothing is
  // committed if any statement fails. Name and camera id are written back
  // unchanged. Returns the number of rows that had a reference pose.
  pub fn write_priors(&mut self, priors: &PriorPoses) -> Result<usize, PriorError> {
    let rows = self.image_rows()?;
    let tx = self.conn.transaction()?;
    let mut matched = 0;
    {
      let mut stmt = tx.prepare(
        "UPDATE images SET name = ?1, camera_id = ?2,
         prior_qw = ?3, prior_qx = ?4, prior_qy = ?5, prior_qz = ?6,
         prior_tx = ?7, prior_ty = ?8, prior_tz = ?9
         WHERE image_id = ?10",
      )?;
      for row in &rows {
        if priors.contains(&row.name) { matched += 1; }
        let (qvec, tvec) = priors.lookup(&row.name);
        stmt.execute(params![
          row.name,
          row.camera_id,
          real_or_null(qvec[0]),
          real_or_null(qvec[1]),
          real_or_null(qvec[2]),
          real_or_null(qvec[3]),
          real_or_null(tvec[0]),
          real_or_null(tvec[1]),
          real_or_null(tvec[2]),
          row.image_id,
        ])?;
      }
    }
    tx.commit()?;
    Ok(matched)
  }

  pub fn close(self) -> Result<(), PriorError> {
    self.conn.close().map_err(|(_, err)| PriorError::Database(err))
  }
}

// SQLite has no NaN REAL, absent pose components are stored as NULL.
fn real_or_null(x: f64) -> Option<f64> {
  if x.is_nan() { None } else { Some(x) }
}

#[cfg(test)]
pub fn create_images_table(conn: &Connection) {
  conn.execute_batch(
    "CREATE TABLE images (
       image_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
       name TEXT NOT NULL UNIQUE,
       camera_id INTEGER NOT NULL,
       prior_qw REAL,
       prior_qx REAL,
       prior_qy REAL,
       prior_qz REAL,
       prior_tx REAL,
       prior_ty REAL,
       prior_tz REAL
     )",
  ).unwrap();
}

#[cfg(test)]
pub fn insert_image(conn: &Connection, name: &str, camera_id: i64) {
  conn.execute(
    "INSERT INTO images (name, camera_id) VALUES (?1, ?2)",
    params![name, camera_id],
  ).unwrap();
}

#[cfg(test)]
pub fn read_prior_fields(conn: &Connection, name: &str) -> Vec<Option<f64>> {
  conn.query_row(
    "SELECT prior_qw, prior_qx, prior_qy, prior_qz, prior_tx, prior_ty, prior_tz
     FROM images WHERE name = ?1",
    params![name],
    |row| {
      (0..7).map(|i| row.get::<_, Option<f64>>(i)).collect()
    },
  ).unwrap()
}
