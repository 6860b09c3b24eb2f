use crate::all::*;

// Reader for the image records of a reference reconstruction. The model
// directory holds either `images.bin` or `images.txt`; cameras and 3D points
// are not needed here and are never read.
//
// Format documentation: <https://colmap.github.io/format.html>

/// One registered image of the reference model.
pub struct ModelImage {
  pub image_id: u32,
  pub camera_id: u32,
  pub name: String,
  /// Orientation quaternion, scalar-first (w, x, y, z).
  pub qvec: Vector4d,
  /// Translation of the world-to-camera transform.
  pub tvec: Vector3d,
}

pub fn read_model_images(model_dir: &Path) -> Result<Vec<ModelImage>> {
  let bin = model_dir.join("images.bin");
  let txt = model_dir.join("images.txt");
  if bin.is_file() {
    read_images_bin(&bin)
  }
  else if txt.is_file() {
    read_images_txt(&txt)
  }
  else {
    bail!("No images.bin or images.txt in {}", model_dir.display());
  }
}

fn read_u32(reader: &mut impl Read) -> Result<u32> {
  let mut buf = [0u8; 4];
  reader.read_exact(&mut buf)?;
  Ok(u32::from_le_bytes(buf))
}

fn read_u64(reader: &mut impl Read) -> Result<u64> {
  let mut buf = [0u8; 8];
  reader.read_exact(&mut buf)?;
  Ok(u64::from_le_bytes(buf))
}

fn read_f64(reader: &mut impl Read) -> Result<f64> {
  let mut buf = [0u8; 8];
  reader.read_exact(&mut buf)?;
  Ok(f64::from_le_bytes(buf))
}

// Little-endian layout per image: u32 id, 7 doubles (qw qx qy qz tx ty tz),
// u32 camera id, NUL-terminated name, u64 point count and 24 bytes per point.
fn read_images_bin(path: &Path) -> Result<Vec<ModelImage>> {
  let file = File::open(path).context(format!("Failed to open {}", path.display()))?;
  let mut reader = BufReader::new(file);

  let count = read_u64(&mut reader)?;
  let mut images = Vec::with_capacity(count as usize);
  for _ in 0..count {
    let image_id = read_u32(&mut reader)?;
    let mut pose = [0.; 7];
    for x in pose.iter_mut() {
      *x = read_f64(&mut reader)?;
    }
    let camera_id = read_u32(&mut reader)?;

    let mut raw_name = vec![];
    reader.read_until(0, &mut raw_name)?;
    if raw_name.last() == Some(&0) { raw_name.pop(); }
    let name = String::from_utf8(raw_name)
      .context("Image name in binary model is not valid UTF-8.")?;

    // The 2D points carry (x, y, point3d_id) each.
    let point_count = read_u64(&mut reader)?;
    reader.seek_relative(point_count as i64 * 24)
      .context("Truncated 2D point data in binary model.")?;

    images.push(ModelImage {
      image_id,
      camera_id,
      name,
      qvec: Vector4d::new(pose[0], pose[1], pose[2], pose[3]),
      tvec: Vector3d::new(pose[4], pose[5], pose[6]),
    });
  }
  Ok(images)
}

// Text layout: comment lines start with `#`, then two lines per image. The
// first is `IMAGE_ID QW QX QY QZ TX TY TZ CAMERA_ID NAME`, the second lists
// the 2D points and is skipped.
fn read_images_txt(path: &Path) -> Result<Vec<ModelImage>> {
  let file = File::open(path).context(format!("Failed to open {}", path.display()))?;
  let reader = BufReader::new(file);

  let mut images = vec![];
  let mut expect_points = false;
  for line in reader.lines() {
    let line = line?;
    let line = line.trim();
    // The points line directly follows its image line and may be empty.
    if expect_points {
      expect_points = false;
      continue;
    }
    if line.is_empty() || line.starts_with('#') { continue }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 10 {
      bail!("Image line in text model has {} fields, expected at least 10: {}", fields.len(), line);
    }
    let image_id = fields[0].parse::<u32>()
      .context(format!("Bad image id in text model: {}", fields[0]))?;
    let mut pose = [0.; 7];
    for (x, field) in pose.iter_mut().zip(&fields[1..8]) {
      *x = field.parse::<f64>()
        .context(format!("Bad pose value in text model: {}", field))?;
    }
    let camera_id = fields[8].parse::<u32>()
      .context(format!("Bad camera id in text model: {}", fields[8]))?;
    let name = fields[9..].join(" ");

    images.push(ModelImage {
      image_id,
      camera_id,
      name,
      qvec: Vector4d::new(pose[0], pose[1], pose[2], pose[3]),
      tvec: Vector3d::new(pose[4], pose[5], pose[6]),
    });
    expect_points = true;
  }
  Ok(images)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn push_image_bin(
    out: &mut Vec<u8>,
    image_id: u32,
    pose: [f64; 7],
    camera_id: u32,
    name: &str,
    point_count: u64,
  ) {
    out.extend(image_id.to_le_bytes());
    for x in pose {
      out.extend(x.to_le_bytes());
    }
    out.extend(camera_id.to_le_bytes());
    out.extend(name.as_bytes());
    out.push(0);
    out.extend(point_count.to_le_bytes());
    out.extend(vec![0u8; point_count as usize * 24]);
  }

  #[test]
  fn test_read_images_bin() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = vec![];
    data.extend(2u64.to_le_bytes());
    push_image_bin(&mut data, 1, [1., 0., 0., 0., 0.5, -0.5, 2.], 1, "frame_000.png", 3);
    push_image_bin(&mut data, 7, [0.7, 0.1, 0.2, 0.3, -1., 0., 1.], 2, "frame_001.png", 0);
    fs::write(dir.path().join("images.bin"), &data).unwrap();

    let images = read_model_images(dir.path()).unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].image_id, 1);
    assert_eq!(images[0].camera_id, 1);
    assert_eq!(images[0].name, "frame_000.png");
    assert_eq!(images[0].qvec, Vector4d::new(1., 0., 0., 0.));
    assert_eq!(images[0].tvec, Vector3d::new(0.5, -0.5, 2.));
    assert_eq!(images[1].image_id, 7);
    assert_eq!(images[1].name, "frame_001.png");
  }

  #[test]
  fn test_read_images_txt() {
    let dir = tempfile::tempdir().unwrap();
    let text = "\
# Image list with two lines of data per image:
#   IMAGE_ID, QW, QX, QY, QZ, TX, TY, TZ, CAMERA_ID, NAME

1 1.0 0.0 0.0 0.0 0.5 -0.5 2.0 1 frame_000.png
100.0 200.0 42 300.0 400.0 -1
2 0.7 0.1 0.2 0.3 -1.0 0.0 1.0 2 holiday photo.jpg

";
    fs::write(dir.path().join("images.txt"), text).unwrap();

    let images = read_model_images(dir.path()).unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].name, "frame_000.png");
    assert_eq!(images[0].tvec, Vector3d::new(0.5, -0.5, 2.));
    assert_eq!(images[1].name, "holiday photo.jpg");
    assert_eq!(images[1].qvec, Vector4d::new(0.7, 0.1, 0.2, 0.3));
  }

  #[test]
  fn test_read_images_txt_bad_pose() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
      dir.path().join("images.txt"),
      "1 1.0 xyz 0.0 0.0 0.5 -0.5 2.0 1 frame_000.png\n\n",
    ).unwrap();
    assert!(read_model_images(dir.path()).is_err());
  }

  #[test]
  fn test_missing_model_files() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_model_images(dir.path()).is_err());
  }
}
