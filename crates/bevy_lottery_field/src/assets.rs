use core::result::Result;

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::tasks::ConditionalSendFuture;
use lottery_field::prelude::*;
use serde::{Deserialize, Serialize};

/// Asset describing a prize catalog and, optionally, the field it should populate.
///
/// ```ron
/// (
///     prizes: [
///         (id: 1, name: "Candy", probability: 70.0, rarity: Common),
///         (id: 2, name: "Golden Ticket", probability: 5.0, rarity: Legendary),
///     ],
///     field: Some((object_count: 12, max_capacity: 30)),
/// )
/// ```
#[derive(Asset, TypePath, Clone, Debug, Serialize, Deserialize)]
pub struct PrizeCatalogAsset {
    pub prizes: Vec<Prize>,
    #[serde(default)]
    pub field: Option<FieldConfig>,
}

impl PrizeCatalogAsset {
    /// Field configuration from the asset, or the defaults.
    pub fn field_config(&self) -> FieldConfig {
        self.field.clone().unwrap_or_default()
    }
}

impl From<&PrizeCatalogAsset> for PrizeCatalog {
    fn from(asset: &PrizeCatalogAsset) -> Self {
        PrizeCatalog::new(asset.prizes.clone())
    }
}

impl From<PrizeCatalogAsset> for PrizeCatalog {
    fn from(asset: PrizeCatalogAsset) -> Self {
        PrizeCatalog::new(asset.prizes)
    }
}

/// Asset loader for [`PrizeCatalogAsset`] using RON files with `.prizes` extension.
///
/// Catalogs with validation errors still load; the report is logged.
#[derive(TypePath)]
pub struct PrizeCatalogAssetLoader;

impl AssetLoader for PrizeCatalogAssetLoader {
    type Asset = PrizeCatalogAsset;
    type Settings = ();
    type Error = anyhow::Error;

    fn extensions(&self) -> &[&str] {
        &["prizes"]
    }

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        let path = format!("{:?}", context.path());
        Box::pin(async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            let asset: PrizeCatalogAsset =
                ron::de::from_bytes(&bytes).map_err(|e| anyhow::anyhow!(e))?;

            let report = validate_catalog(&asset.prizes);
            for error in &report.errors {
                warn!("Prize catalog {}: {}", path, error);
            }
            for warning in &report.warnings {
                debug!("Prize catalog {}: {}", path, warning);
            }
            Ok(asset)
        })
    }
}

impl FromWorld for PrizeCatalogAssetLoader {
    fn from_world(_: &mut World) -> Self {
        PrizeCatalogAssetLoader
    }
}
