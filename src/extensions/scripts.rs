use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FinderError, FinderResult};

/// Slit width, in arcsec, that the suggested exposure times refer to.
pub const REFERENCE_SLIT_WIDTH_ARCSEC: f64 = 2.0;

/// Internal calibration lamps, in the order they appear in lamp commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lamp {
    Neon,
    Krypton,
    Argon,
    Quartz,
}

impl Lamp {
    pub const ALL: [Lamp; 4] = [Lamp::Neon, Lamp::Krypton, Lamp::Argon, Lamp::Quartz];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Lamp::Neon => "neon",
            Lamp::Krypton => "krypton",
            Lamp::Argon => "argon",
            Lamp::Quartz => "quartz",
        }
    }
}

impl fmt::Display for Lamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Lamp {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lamp::ALL
            .into_iter()
            .find(|lamp| lamp.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FinderError::InvalidData(format!("unknown calibration lamp `{s}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disperser {
    Red,
    Blue,
}

impl Disperser {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Disperser::Red => "red",
            Disperser::Blue => "blue",
        }
    }

    /// Suggested exposure, in seconds, for a 2" slit without binning.
    #[must_use]
    pub const fn suggested_exposure_s(self, lamp: Lamp) -> f64 {
        match (self, lamp) {
            (Disperser::Red, Lamp::Neon) => 1.0,
            (Disperser::Red, Lamp::Argon) => 2.0,
            (Disperser::Red, Lamp::Krypton) => 1.0,
            (Disperser::Red, Lamp::Quartz) => 15.0,
            (Disperser::Blue, Lamp::Neon) => 2.0,
            (Disperser::Blue, Lamp::Argon) => 45.0,
            (Disperser::Blue, Lamp::Krypton) => 30.0,
            (Disperser::Blue, Lamp::Quartz) => 80.0,
        }
    }
}

impl fmt::Display for Disperser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Instrument setup to calibrate. Map order is command order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptWriterConfig {
    /// Slit name to wheel position. Names start with the width in arcsec, as in `1.18-ctr`.
    #[serde(default = "default_slits")]
    pub slits: IndexMap<String, u32>,
    #[serde(default = "default_dispersers")]
    pub dispersers: IndexMap<Disperser, u32>,
    /// `[x, y]` detector binning.
    #[serde(default = "default_binning")]
    pub binning: [u32; 2],
}

impl Default for ScriptWriterConfig {
    fn default() -> Self {
        Self {
            slits: default_slits(),
            dispersers: default_dispersers(),
            binning: default_binning(),
        }
    }
}

impl ScriptWriterConfig {
    pub fn from_json_str(input: &str) -> FinderResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            FinderError::InvalidData(format!("failed to parse script writer config: {e}"))
        })
    }

    #[must_use]
    pub fn binning_string(&self) -> String {
        format!("{}x{}", self.binning[0], self.binning[1])
    }
}

fn default_slits() -> IndexMap<String, u32> {
    IndexMap::from([("7.1-ctr".to_owned(), 1), ("1.18-ctr".to_owned(), 2)])
}

fn default_dispersers() -> IndexMap<Disperser, u32> {
    IndexMap::from([(Disperser::Red, 6), (Disperser::Blue, 3)])
}

fn default_binning() -> [u32; 2] {
    [2, 2]
}

/// Guesses the slit width in arcsec from the part of its name before `-`.
pub fn guess_slit_width(slit_name: &str) -> FinderResult<f64> {
    let prefix = slit_name.split('-').next().unwrap_or(slit_name);
    match prefix.trim().parse::<f64>() {
        Ok(width) if width.is_finite() && width > 0.0 => Ok(width),
        _ => Err(FinderError::InvalidData(format!(
            "cannot guess a slit width from `{slit_name}`"
        ))),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Slit {
    name: String,
    position: u32,
    width_arcsec: f64,
}

/// Accumulates a TUI command script of KOSMOS calibration exposures.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptWriter {
    config: ScriptWriterConfig,
    slits: Vec<Slit>,
    lines: Vec<String>,
}

impl ScriptWriter {
    pub fn new(config: ScriptWriterConfig) -> FinderResult<Self> {
        if config.binning.contains(&0) {
            return Err(FinderError::InvalidData("binning must be >= 1".to_owned()));
        }
        let slits = config
            .slits
            .iter()
            .map(|(name, &position)| {
                Ok(Slit {
                    name: name.clone(),
                    position,
                    width_arcsec: guess_slit_width(name)?,
                })
            })
            .collect::<FinderResult<Vec<_>>>()?;

        let writer = Self {
            config,
            slits,
            lines: Vec::new(),
        };
        for line in writer.setup_summary() {
            info!("{line}");
        }
        Ok(writer)
    }

    /// The disperser, slit and binning setup this writer assumes, one line each.
    #[must_use]
    pub fn setup_summary(&self) -> Vec<String> {
        let mut summary = vec!["Assuming dispersers to calibrate are...".to_owned()];
        for (disperser, position) in &self.config.dispersers {
            summary.push(format!(" position #{position} = {disperser}"));
        }
        summary.push("Assuming slits to calibrate are...".to_owned());
        for slit in &self.slits {
            summary.push(format!(" position #{} = {}", slit.position, slit.name));
        }
        summary.push("Assuming binning is...".to_owned());
        summary.push(format!(" {}", self.config.binning_string()));
        summary
    }

    /// Appends a raw command line.
    pub fn say(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn comment(&mut self, text: &str) {
        self.lines.push(format!("#{text}"));
    }

    /// Takes `n` exposures of `lamp` for every slit and disperser, then turns the lamps off.
    ///
    /// Exposure times scale from the 2" reference by binning and slit width.
    /// A non-empty `note` is appended to each file name.
    pub fn take_lamps(&mut self, lamp: Lamp, n: u32, note: &str) {
        self.comment(&format!("taking {n} {lamp} calibrations"));

        let mut command = "kosmos set calstage=in".to_owned();
        for candidate in Lamp::ALL {
            let state = if candidate == lamp { "on" } else { "off" };
            command.push_str(&format!(" {candidate}={state}"));
        }
        self.say(command);

        let binning_factor = 1.0 / f64::from(self.config.binning[0] * self.config.binning[1]);
        let binning = self.config.binning_string();
        let slit_count = self.slits.len();
        let disperser_count = self.config.dispersers.len();
        let mut lines = Vec::with_capacity(slit_count * disperser_count * 3);

        for (i_slit, slit) in self.slits.iter().enumerate() {
            let slit_factor = REFERENCE_SLIT_WIDTH_ARCSEC / slit.width_arcsec;
            for (i_disperser, (&disperser, &position)) in self.config.dispersers.iter().enumerate() {
                let time = disperser.suggested_exposure_s(lamp) * binning_factor * slit_factor;
                lines.push(format!(
                    "# lamp {lamp}, slit={} ({}/{slit_count}), disperser={disperser} ({}/{disperser_count}),  {n} iterations",
                    slit.name,
                    i_slit + 1,
                    i_disperser + 1
                ));
                lines.push(format!(
                    "kosmos set slit={} disperser={position}",
                    slit.position
                ));
                let mut file_name = format!("{binning}/cals/{disperser}-{}-{lamp}", slit.name);
                if !note.is_empty() {
                    file_name.push('-');
                    file_name.push_str(note);
                }
                lines.push(format!(
                    "kosmosExpose flat time={time:.2} n={n} name=\"{file_name}\" seq=nextByDir comment=\"\""
                ));
            }
        }
        self.lines.extend(lines);

        self.comment("turning off lamps");
        self.say(lamps_off());
        self.say("");
        debug!(%lamp, n, slits = slit_count, dispersers = disperser_count, "added lamp calibrations");
    }

    pub fn take_bias(&mut self, n: u32) {
        self.comment(&format!("taking {n} bias calibrations"));
        self.say(lamps_off());
        self.say(format!(
            "kosmosExpose bias n={n} name=\"{}/cals/bias\" seq=nextByDir comment=\"\"",
            self.config.binning_string()
        ));
        self.say("");
        debug!(n, "added bias calibrations");
    }

    /// The full script, one command per line.
    #[must_use]
    pub fn script(&self) -> String {
        self.lines.join("\n")
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn config(&self) -> &ScriptWriterConfig {
        &self.config
    }
}

impl fmt::Display for ScriptWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.script())
    }
}

fn lamps_off() -> String {
    let mut command = "kosmos set calstage=in".to_owned();
    for lamp in Lamp::ALL {
        command.push_str(&format!(" {lamp}=off"));
    }
    command
}

#[cfg(test)]
mod tests {
    use super::{Lamp, guess_slit_width};

    #[test]
    fn slit_width_comes_from_name_prefix() {
        assert_eq!(guess_slit_width("1.18-ctr").ok(), Some(1.18));
        assert_eq!(guess_slit_width("7.1").ok(), Some(7.1));
        assert!(guess_slit_width("wide-ctr").is_err());
    }

    #[test]
    fn lamp_names_parse_case_insensitively() {
        assert_eq!("Argon".parse::<Lamp>().ok(), Some(Lamp::Argon));
        assert!("xenon".parse::<Lamp>().is_err());
    }
}
