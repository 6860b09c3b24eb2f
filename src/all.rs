// NOTE This kind of import-all file isn't a common Rust idiom.

pub use crate::{
  db::*,
  error::*,
  model::*,
  pipeline::*,
  priors::*,
  types::*,
  util::*,
};

pub use {
  std::{
    collections::HashMap,
    fs::{self, File},
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
  },
  log::{debug, error, info, warn, LevelFilter},
  anyhow::{anyhow, bail, Context as AnyhowContext, Result},
};
