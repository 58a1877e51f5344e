use tracing::{debug, info};

use crate::{
    BoundingRegion, Feature, FeatureCollection, FeatureId, FeatureSource, FitOutcome, Viewport,
    inspect, normalize_filter,
};

/// Features loaded for one table.
#[derive(Debug, Clone)]
pub struct Layer {
    table: String,
    filter: Option<String>,
    visible: bool,
    features: FeatureCollection,
    bounds: BoundingRegion,
}

impl Layer {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn features(&self) -> &FeatureCollection {
        &self.features
    }

    pub fn bounds(&self) -> BoundingRegion {
        self.bounds
    }
}

/// Map state owned by the caller: the viewport and the loaded layers in
/// load order.
#[derive(Debug, Clone, Default)]
pub struct MapSession {
    viewport: Viewport,
    layers: Vec<Layer>,
}

impl MapSession {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layers: Vec::new(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, table: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.table == table)
    }

    fn layer_mut(&mut self, table: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.table == table)
    }

    /// Inserts or replaces the layer for `table` and fits the viewport to
    /// its features. A layer with no coordinates leaves the viewport as is.
    pub fn load_layer(
        &mut self,
        table: &str,
        filter: Option<&str>,
        features: FeatureCollection,
    ) -> FitOutcome {
        let bounds = features.bounds();
        info!(
            table,
            features = features.len(),
            skipped = features.unrecognized_count(),
            "loaded layer"
        );
        let layer = Layer {
            table: table.to_owned(),
            filter: normalize_filter(filter).map(str::to_owned),
            visible: true,
            features,
            bounds,
        };
        match self.layer_mut(table) {
            Some(existing) => *existing = layer,
            None => self.layers.push(layer),
        }

        let outcome = self.viewport.fit(&bounds);
        if outcome == FitOutcome::Unchanged {
            debug!(table, "nothing to fit, viewport unchanged");
        }
        outcome
    }

    /// Fetches `table` from `source` and loads it as a layer.
    pub async fn refresh_layer<S: FeatureSource>(
        &mut self,
        source: &S,
        table: &str,
        filter: Option<&str>,
    ) -> Result<FitOutcome, S::Error> {
        let filter = normalize_filter(filter);
        let features = source.fetch(table, filter).await?;
        Ok(self.load_layer(table, filter, features))
    }

    /// Flips visibility, returning the new state, or `None` for an unknown
    /// table.
    pub fn toggle_layer(&mut self, table: &str) -> Option<bool> {
        let layer = self.layer_mut(table)?;
        layer.visible = !layer.visible;
        Some(layer.visible)
    }

    pub fn set_visible(&mut self, table: &str, visible: bool) -> bool {
        match self.layer_mut(table) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn remove_layer(&mut self, table: &str) -> Option<Layer> {
        let index = self.layers.iter().position(|l| l.table == table)?;
        Some(self.layers.remove(index))
    }

    pub fn visible_bounds(&self) -> BoundingRegion {
        self.layers
            .iter()
            .filter(|l| l.visible)
            .map(|l| l.bounds)
            .fold(BoundingRegion::new(), BoundingRegion::merge)
    }

    pub fn fit_visible(&mut self) -> FitOutcome {
        let region = self.visible_bounds();
        self.viewport.fit(&region)
    }

    pub fn feature(&self, table: &str, id: &FeatureId) -> Option<&Feature> {
        self.layer(table)?.features.find(id)
    }

    pub fn inspect(&self, table: &str, id: &FeatureId) -> Option<String> {
        self.feature(table, id).map(inspect)
    }
}
