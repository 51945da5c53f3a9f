pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use indexmap::IndexSet;
pub use log::{info, warn};
pub use ndarray::{s, Array1, Array2, Array3, Array4, ArrayView1, Axis};
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};
