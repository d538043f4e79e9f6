// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs, Debug)]
/// barclust - Cluster PCR barcode flanks and primers by alignment distance
pub struct Args {
    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,

    #[argh(subcommand)]
    pub command: Option<Command>,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
pub enum Command {
    Flanks(FlanksArgs),
    Primers(PrimersArgs),
}

#[derive(FromArgs, Debug, Default)]
/// extract left and right flanks from a FASTA file and keep one sequence per cluster
#[argh(subcommand, name = "flanks")]
pub struct FlanksArgs {
    /// FASTA file with full-length sequences (.gz allowed)
    #[argh(option)]
    pub input: Option<String>,

    /// output prefix (default: flanking.<timestamp>)
    #[argh(option)]
    pub output: Option<String>,

    /// flank length (default: 400)
    #[argh(option)]
    pub border: Option<usize>,

    /// cluster with vsearch at this identity (0.1-1.0) instead of OPTICS
    #[argh(option)]
    pub identity: Option<f64>,

    /// directory for intermediate vsearch files (default: system temp)
    #[argh(option)]
    pub scratch: Option<String>,

    /// OPTICS min_samples before clamping (default: 2)
    #[argh(option)]
    pub min_samples: Option<usize>,

    /// number of threads, 0 or less for all cores (default: all cores)
    #[argh(option)]
    pub threads: Option<i32>,

    /// alignment mode: semi-global, banded:<width>, unweighted (default: semi-global)
    #[argh(option)]
    pub alignment_mode: Option<String>,

    /// distance metric: satoh, indel-fraction (default: satoh)
    #[argh(option)]
    pub metric: Option<String>,

    /// fail instead of falling back to unweighted scoring
    #[argh(switch)]
    pub no_fallback: bool,

    /// show a progress bar while building score matrices
    #[argh(switch)]
    pub progress: bool,
}

#[derive(FromArgs, Debug, Default)]
/// assign a cluster label to every primer of a CSV table
#[argh(subcommand, name = "primers")]
pub struct PrimersArgs {
    /// CSV table with a 'primer' column (.gz allowed)
    #[argh(option)]
    pub input: Option<String>,

    /// output prefix, '.csv' is appended (default: clusters.<timestamp>)
    #[argh(option)]
    pub output: Option<String>,

    /// OPTICS min_samples before clamping (default: 2)
    #[argh(option)]
    pub min_samples: Option<usize>,

    /// number of threads, 0 or less for all cores (default: all cores)
    #[argh(option)]
    pub threads: Option<i32>,

    /// alignment mode: semi-global, banded:<width>, unweighted (default: semi-global)
    #[argh(option)]
    pub alignment_mode: Option<String>,

    /// distance metric: satoh, indel-fraction (default: satoh)
    #[argh(option)]
    pub metric: Option<String>,

    /// fail instead of falling back to unweighted scoring
    #[argh(switch)]
    pub no_fallback: bool,

    /// show a progress bar while building the score matrix
    #[argh(switch)]
    pub progress: bool,
}

/// Options both subcommands share, after merging with the config file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonOptions {
    pub min_samples: Option<usize>,
    pub threads: Option<i32>,
    pub alignment_mode: Option<String>,
    pub metric: Option<String>,
    pub no_fallback: bool,
    pub progress: bool,
}

impl FlanksArgs {
    pub fn common(&self) -> CommonOptions {
        CommonOptions {
            min_samples: self.min_samples,
            threads: self.threads,
            alignment_mode: self.alignment_mode.clone(),
            metric: self.metric.clone(),
            no_fallback: self.no_fallback,
            progress: self.progress,
        }
    }
}

impl PrimersArgs {
    pub fn common(&self) -> CommonOptions {
        CommonOptions {
            min_samples: self.min_samples,
            threads: self.threads,
            alignment_mode: self.alignment_mode.clone(),
            metric: self.metric.clone(),
            no_fallback: self.no_fallback,
            progress: self.progress,
        }
    }
}
