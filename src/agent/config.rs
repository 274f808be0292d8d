//! Agent argument strings.
//!
//! Agents are described by whitespace-separated `key=value` pairs such as
//! `"name=mcts role=black mcts simu=1000 time=10 rave=0 parallel=4 c=2"`.
//! A bare key is stored with itself as the value. Recognized keys:
//!
//! | key        | meaning                                        |
//! |------------|------------------------------------------------|
//! | `name`     | display name, no `[]():; ` characters          |
//! | `role`     | `black` or `white`                             |
//! | `mcts`     | use tree search instead of random placement    |
//! | `simu`     | iteration cap per decision                     |
//! | `time`     | time budget per decision, seconds              |
//! | `rave`     | `0`/`1` (or `false`/`true`)                    |
//! | `parallel` | number of independent trees                    |
//! | `c`        | exploration constant                           |
//! | `seed`     | RNG seed                                       |
//! | `params`   | JSON file of hyperparameters, applied first    |
//!
//! Anything else lands in [`AgentConfig::extra`].

use crate::game::Side;
use crate::mcts::MCTSHyperparameters;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::str::FromStr;

const FORBIDDEN_NAME_CHARS: &[char] = &['[', ']', '(', ')', ':', ';', ' '];

/// Which search the player runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Random,
    /// A single tree, reused across turns
    Mcts,
    /// Root-parallel trees voting by visits
    ParallelMcts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub role: Side,
    pub strategy: Strategy,
    pub seed: Option<u64>,
    pub hyperparams: MCTSHyperparameters,
    pub extra: BTreeMap<String, String>,
}

fn split_pairs(args: &str) -> BTreeMap<String, String> {
    args.split_whitespace()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), pair.to_string()),
        })
        .collect()
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| Error::InvalidArgument {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(Error::InvalidArgument {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

impl AgentConfig {
    pub fn parse(args: &str) -> Result<Self> {
        let mut meta = split_pairs(args);

        let mut hyperparams = match meta.remove("params") {
            Some(path) => MCTSHyperparameters::load_json(path)?,
            None => MCTSHyperparameters::default(),
        };

        let name = meta.remove("name").unwrap_or_else(|| "random".to_string());
        if name.contains(FORBIDDEN_NAME_CHARS) {
            return Err(Error::InvalidArgument {
                key: "name".into(),
                value: name,
            });
        }

        let role_text = meta.remove("role").unwrap_or_else(|| "unknown".to_string());
        let role = Side::parse(&role_text).ok_or(Error::InvalidArgument {
            key: "role".into(),
            value: role_text,
        })?;

        let use_mcts = meta.remove("mcts").is_some();
        if let Some(v) = meta.remove("simu") {
            hyperparams.max_iterations = parse_value("simu", &v)?;
        }
        if let Some(v) = meta.remove("time") {
            hyperparams.max_seconds = parse_value("time", &v)?;
        }
        if let Some(v) = meta.remove("rave") {
            hyperparams.rave_enabled = parse_flag("rave", &v)?;
        }
        if let Some(v) = meta.remove("parallel") {
            hyperparams.workers = parse_value("parallel", &v)?;
        }
        if let Some(v) = meta.remove("c") {
            hyperparams.exploration_constant = parse_value("c", &v)?;
        }
        let seed = match meta.remove("seed") {
            Some(v) => Some(parse_value::<u64>("seed", &v)?),
            None => hyperparams.seed,
        };
        hyperparams.seed = seed;
        hyperparams.validate()?;

        let strategy = match (use_mcts, hyperparams.workers) {
            (false, _) => Strategy::Random,
            (true, 1) => Strategy::Mcts,
            (true, _) => Strategy::ParallelMcts,
        };

        Ok(AgentConfig {
            name,
            role,
            strategy,
            seed,
            hyperparams,
            extra: meta,
        })
    }
}
