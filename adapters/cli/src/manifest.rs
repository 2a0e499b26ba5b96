//! TOML manifests describing tuning overrides and the asset catalogue.

use std::{collections::BTreeMap, fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use lineup_core::{AssetHandle, Cue, FeatureSlot, MusicMood};
use lineup_presentation::{AudioClip, ClipLibrary};
use lineup_system_face_generation::FeatureTables;
use lineup_world::Tuning;
use serde::Deserialize;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Catalogue shipped with the binary, used when no `--assets` is given.
pub(crate) const BUILTIN_ASSETS: &str = include_str!("../assets/default_assets.toml");

/// Reads a tuning file; keys it omits keep their defaults.
pub(crate) fn load_tuning(path: &Path) -> Result<Tuning> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file at {}", path.display()))?;
    parse_tuning(&contents)
        .with_context(|| format!("invalid tuning file at {}", path.display()))
}

fn parse_tuning(contents: &str) -> Result<Tuning> {
    let tuning: Tuning = toml::from_str(contents).context("failed to parse tuning toml")?;
    tuning.validate()?;
    Ok(tuning)
}

/// Asset handles resolved from a manifest, with the names they stand for.
#[derive(Debug)]
pub(crate) struct Catalogue {
    pub(crate) tables: FeatureTables,
    pub(crate) clips: ClipLibrary,
    names: Vec<String>,
}

impl Catalogue {
    /// Name of the asset behind `handle`.
    pub(crate) fn name(&self, handle: AssetHandle) -> &str {
        usize::try_from(handle.get())
            .ok()
            .and_then(|index| self.names.get(index))
            .map_or("<unknown>", String::as_str)
    }
}

/// Reads an asset manifest from disk.
pub(crate) fn load_catalogue(path: &Path) -> Result<Catalogue> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read asset manifest at {}", path.display()))?;
    parse_catalogue(&contents)
        .with_context(|| format!("invalid asset manifest at {}", path.display()))
}

#[derive(Debug, Deserialize)]
struct Manifest {
    version: u32,
    #[serde(default)]
    bodies: Vec<String>,
    #[serde(default)]
    features: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    cues: BTreeMap<Cue, ClipEntry>,
    #[serde(default)]
    music: MusicLists,
}

#[derive(Debug, Default, Deserialize)]
struct MusicLists {
    #[serde(default)]
    draw: Vec<ClipEntry>,
    #[serde(default)]
    order: Vec<ClipEntry>,
}

#[derive(Debug, Deserialize)]
struct ClipEntry {
    clip: String,
    duration: f32,
}

impl ClipEntry {
    fn to_clip(&self) -> Result<AudioClip> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            bail!(
                "clip `{}` has invalid duration {}",
                self.clip,
                self.duration
            );
        }
        Ok(AudioClip::new(
            self.clip.as_str(),
            Duration::from_secs_f32(self.duration),
        ))
    }
}

pub(crate) fn parse_catalogue(contents: &str) -> Result<Catalogue> {
    let mut manifest: Manifest =
        toml::from_str(contents).context("failed to parse asset manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported asset manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut names = Vec::new();
    let mut tables = FeatureTables::new();
    for slot in FeatureSlot::ALL {
        let entries = manifest.features.remove(slot.label()).unwrap_or_default();
        if entries.is_empty() && slot.blank_probability().is_none() {
            log::warn!("asset manifest has no {} entries", slot.label());
        }
        tables.set_pool(slot, register(&mut names, entries)?);
    }
    if !manifest.features.is_empty() {
        let unexpected = manifest
            .features
            .into_keys()
            .collect::<Vec<_>>()
            .join(", ");
        bail!("asset manifest contains unknown feature slots: {unexpected}");
    }
    let bodies = register(&mut names, std::mem::take(&mut manifest.bodies))?;
    let tables = tables.with_bodies(bodies);

    let mut clips = ClipLibrary::new();
    for (cue, entry) in &manifest.cues {
        clips = clips.with_cue(*cue, entry.to_clip()?);
    }
    for (mood, entries) in [
        (MusicMood::Draw, &manifest.music.draw),
        (MusicMood::Order, &manifest.music.order),
    ] {
        for entry in entries {
            clips = clips.with_track(mood, entry.to_clip()?);
        }
    }

    Ok(Catalogue {
        tables,
        clips,
        names,
    })
}

fn register(names: &mut Vec<String>, entries: Vec<String>) -> Result<Vec<AssetHandle>> {
    let mut handles = Vec::with_capacity(entries.len());
    for entry in entries {
        let index = u32::try_from(names.len()).context("asset manifest holds too many entries")?;
        handles.push(AssetHandle::new(index));
        names.push(entry);
    }
    Ok(handles)
}
