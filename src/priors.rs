use crate::all::*;

// The reference poses keyed by image filename. A lookup source only, built
// once per run. A duplicate name in the model overwrites the earlier record
// in both maps.
pub struct PriorPoses {
  tvec_by_name: HashMap<String, Vector3d>,
  qvec_by_name: HashMap<String, Vector4d>,
}

impl PriorPoses {
  pub fn from_model(images: &[ModelImage]) -> PriorPoses {
    let mut tvec_by_name = HashMap::new();
    let mut qvec_by_name = HashMap::new();
    for image in images {
      debug!("Prior pose from image {} (camera {}): {}",
        image.image_id, image.camera_id, image.name);
      tvec_by_name.insert(image.name.clone(), image.tvec);
      qvec_by_name.insert(image.name.clone(), image.qvec);
    }
    PriorPoses { tvec_by_name, qvec_by_name }
  }

  pub fn len(&self) -> usize {
    self.tvec_by_name.len()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.tvec_by_name.contains_key(name)
  }

  // NaN-filled vectors for images the reference model does not know. The
  // database layer stores those components as NULL.
  pub fn lookup(&self, name: &str) -> (Vector4d, Vector3d) {
    match (self.qvec_by_name.get(name), self.tvec_by_name.get(name)) {
      (Some(qvec), Some(tvec)) => (*qvec, *tvec),
      _ => (Vector4d::repeat(f64::NAN), Vector3d::repeat(f64::NAN)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn model_image(name: &str, w: f64, tx: f64) -> ModelImage {
    ModelImage {
      image_id: 1,
      camera_id: 1,
      name: name.to_string(),
      qvec: Vector4d::new(w, 0., 0., 0.),
      tvec: Vector3d::new(tx, 0., 0.),
    }
  }

  #[test]
  fn test_lookup() {
    let priors = PriorPoses::from_model(&[
      model_image("a.png", 1., 2.),
      model_image("b.png", 0.5, -1.),
    ]);
    assert_eq!(priors.len(), 2);
    assert!(priors.contains("a.png"));
    assert!(!priors.contains("c.png"));

    let (qvec, tvec) = priors.lookup("b.png");
    assert_eq!(qvec, Vector4d::new(0.5, 0., 0., 0.));
    assert_eq!(tvec, Vector3d::new(-1., 0., 0.));

    let (qvec, tvec) = priors.lookup("c.png");
    assert!(qvec.iter().all(|x| x.is_nan()));
    assert!(tvec.iter().all(|x| x.is_nan()));
  }

  #[test]
  fn test_duplicate_name_keeps_later() {
    let priors = PriorPoses::from_model(&[
      model_image("a.png", 1., 2.),
      model_image("a.png", 0.5, 9.),
    ]);
    assert_eq!(priors.len(), 1);
    let (qvec, tvec) = priors.lookup("a.png");
    assert_eq!(qvec[0], 0.5);
    assert_eq!(tvec[0], 9.);
  }
}
