use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::conversion::{
    Converted, DbToDbm, DbmToWatts, PowerConversions, WattsToDb, WattsToDbm,
};
use crate::error::{Error, Result};
use crate::stage::Stage;
use crate::workbench::Workbench;

#[derive(Deserialize, Debug)]
struct ChainConfig {
    stages: Vec<StageConfig>,
    #[serde(default)]
    conversions: ConversionsConfig,
}

#[derive(Deserialize, Debug)]
struct IncludedConfig {
    stages: Vec<StageConfig>,
}

#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StageConfig {
    Explicit {
        name: String,
        gain_db: f64,
        noise_figure_db: f64,
        p1db_dbm: f64,
        ip3_dbm: f64,
    },
    Include {
        path: String,
    },
}

#[derive(Deserialize, Debug, Default)]
struct ConversionsConfig {
    #[serde(default)]
    db_to_dbm: DbToDbm,
    #[serde(default)]
    dbm_to_watts: DbmToWatts,
    #[serde(default)]
    watts_to_dbm: WattsToDbm,
    #[serde(default)]
    watts_to_db: WattsToDb,
}

impl From<ConversionsConfig> for PowerConversions {
    fn from(config: ConversionsConfig) -> Self {
        PowerConversions {
            db_to_dbm: Converted::new(config.db_to_dbm),
            dbm_to_watts: Converted::new(config.dbm_to_watts),
            watts_to_dbm: Converted::new(config.watts_to_dbm),
            watts_to_db: Converted::new(config.watts_to_db),
        }
    }
}

/// Contents of a chain file: the ordered stages and the conversion inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
    pub stages: Vec<Stage>,
    pub conversions: PowerConversions,
}

impl From<Chain> for Workbench {
    fn from(chain: Chain) -> Self {
        Workbench::with_stages(chain.stages).with_conversions(chain.conversions)
    }
}

/// Read a chain file, splicing in any `include` entries relative to the file
/// that names them.
pub fn load_chain(path: &Path) -> Result<Chain> {
    tracing::debug!(path = %path.display(), "loading chain file");
    let canonical = canonicalize(path)?;
    let config: ChainConfig = parse_file(&canonical)?;

    let mut stages = Vec::new();
    let mut include_stack = vec![canonical.clone()];
    let base_dir = canonical.parent().unwrap_or_else(|| Path::new("."));
    load_stages_recursive(config.stages, &mut stages, base_dir, &mut include_stack)?;

    tracing::debug!(stages = stages.len(), "chain file loaded");
    Ok(Chain {
        stages,
        conversions: config.conversions.into(),
    })
}

fn load_stages_recursive(
    stage_configs: Vec<StageConfig>,
    stages: &mut Vec<Stage>,
    base_dir: &Path,
    include_stack: &mut Vec<PathBuf>,
) -> Result<()> {
    for stage_config in stage_configs {
        match stage_config {
            StageConfig::Explicit {
                name,
                gain_db,
                noise_figure_db,
                p1db_dbm,
                ip3_dbm,
            } => {
                stages.push(Stage {
                    name,
                    gain_db,
                    noise_figure_db,
                    p1db_dbm,
                    ip3_dbm,
                });
            }
            StageConfig::Include { path } => {
                let included_path = canonicalize(&base_dir.join(&path))?;
                if include_stack.contains(&included_path) {
                    return Err(Error::IncludeCycle(included_path));
                }
                tracing::debug!(path = %included_path.display(), "loading included stages");
                let included: IncludedConfig = parse_file(&included_path)?;

                let new_base_dir = included_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                include_stack.push(included_path);
                load_stages_recursive(included.stages, stages, &new_base_dir, include_stack)?;
                include_stack.pop();
            }
        }
    }
    Ok(())
}

fn canonicalize(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}
