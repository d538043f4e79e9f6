// alignment.rs - Alignment configuration and scoring modes

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How pairwise scores are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentMode {
    /// End gaps are free; substitution matrix scoring
    SemiGlobal,
    /// Needleman-Wunsch restricted to a diagonal band
    Banded { band: usize },
    /// Match 1, mismatch 0, free gaps; the degraded path
    Unweighted,
}

impl FromStr for AlignmentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "semi-global" | "sg" => Ok(AlignmentMode::SemiGlobal),
            "unweighted" | "fallback" => Ok(AlignmentMode::Unweighted),
            other => match other.strip_prefix("banded") {
                Some(rest) => {
                    let band = rest
                        .trim_start_matches([':', '='])
                        .parse::<usize>()
                        .map_err(|_| format!("Invalid band width in '{}', expected e.g. banded:32", s))?;
                    if band == 0 {
                        return Err("Band width must be greater than 0".to_string());
                    }
                    Ok(AlignmentMode::Banded { band })
                }
                None => Err(format!(
                    "Invalid alignment mode: {}. Use: semi-global, banded:<width>, unweighted",
                    s
                )),
            },
        }
    }
}

impl AlignmentMode {
    pub fn description(&self) -> String {
        match self {
            AlignmentMode::SemiGlobal => "semi-global (free end gaps)".to_string(),
            AlignmentMode::Banded { band } => format!("banded global (band width {})", band),
            AlignmentMode::Unweighted => "unweighted global match count".to_string(),
        }
    }
}

/// Configuration for pairwise scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    pub mode: AlignmentMode,
    /// Named substitution matrix, used by the semi-global mode
    pub substitution_matrix: String,
    /// Alphabet and simple scores, used by the banded mode
    pub alphabet: String,
    pub match_score: i32,
    pub mismatch_penalty: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self::semi_global()
    }
}

impl AlignmentConfig {
    pub fn semi_global() -> Self {
        Self {
            mode: AlignmentMode::SemiGlobal,
            substitution_matrix: "blosum30".to_string(),
            alphabet: "ACGT".to_string(),
            match_score: 2,
            mismatch_penalty: -1,
            gap_open: 9,
            gap_extend: 1,
        }
    }

    pub fn banded(band: usize) -> Self {
        Self {
            mode: AlignmentMode::Banded { band },
            gap_open: 8,
            gap_extend: 1,
            ..Self::semi_global()
        }
    }

    pub fn unweighted() -> Self {
        Self {
            mode: AlignmentMode::Unweighted,
            match_score: 1,
            mismatch_penalty: 0,
            gap_open: 0,
            gap_extend: 0,
            ..Self::semi_global()
        }
    }

    /// Preset parameters for a mode
    pub fn for_mode(mode: AlignmentMode) -> Self {
        match mode {
            AlignmentMode::SemiGlobal => Self::semi_global(),
            AlignmentMode::Banded { band } => Self::banded(band),
            AlignmentMode::Unweighted => Self::unweighted(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("semi-global".parse::<AlignmentMode>().unwrap(), AlignmentMode::SemiGlobal);
        assert_eq!("banded:32".parse::<AlignmentMode>().unwrap(), AlignmentMode::Banded { band: 32 });
        assert_eq!("BANDED=8".parse::<AlignmentMode>().unwrap(), AlignmentMode::Banded { band: 8 });
        assert_eq!("fallback".parse::<AlignmentMode>().unwrap(), AlignmentMode::Unweighted);
        assert!("banded:0".parse::<AlignmentMode>().is_err());
        assert!("banded:x".parse::<AlignmentMode>().is_err());
        assert!("local".parse::<AlignmentMode>().is_err());
    }

    #[test]
    fn test_presets() {
        let sg = AlignmentConfig::default();
        assert_eq!(sg.substitution_matrix, "blosum30");
        assert_eq!((sg.gap_open, sg.gap_extend), (9, 1));

        let banded = AlignmentConfig::for_mode(AlignmentMode::Banded { band: 16 });
        assert_eq!((banded.gap_open, banded.gap_extend), (8, 1));
        assert_eq!((banded.match_score, banded.mismatch_penalty), (2, -1));
        assert_eq!(banded.alphabet, "ACGT");
    }
}
