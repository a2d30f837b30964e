//! Host page wiring: find the chart surfaces by element id, run the reveal
//! animation across all of them, and restart it when the layout changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::animation::{FrameOutcome, RevealAnimation};
use crate::charts::{draw_bar_chart, draw_donut, resize_surface, Palette, Surface};

/// Default bar chart dataset.
pub const DEFAULT_BAR: [f64; 7] = [22.0, 34.0, 18.0, 40.0, 28.0, 46.0, 32.0];
/// Default donut dataset.
pub const DEFAULT_DONUT: [f64; 4] = [60.0, 25.0, 10.0, 5.0];
/// Default secondary bar chart dataset.
pub const DEFAULT_BAR2: [f64; 7] = [12.0, 18.0, 10.0, 22.0, 20.0, 28.0, 26.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Donut,
}

/// A chart position on the page and the element ids that may host it, in
/// lookup order.
#[derive(Debug, Clone, Copy)]
pub struct ChartSlot {
    pub name: &'static str,
    pub kind: ChartKind,
    pub element_ids: &'static [&'static str],
}

pub const SLOTS: [ChartSlot; 3] = [
    ChartSlot {
        name: "bar",
        kind: ChartKind::Bar,
        element_ids: &["chartBar", "chartBar1"],
    },
    ChartSlot {
        name: "donut",
        kind: ChartKind::Donut,
        element_ids: &["chartDonut", "donutChart"],
    },
    ChartSlot {
        name: "bar2",
        kind: ChartKind::Bar,
        element_ids: &["chartBar2"],
    },
];

/// Source of surfaces, keyed by element id.
pub trait HostPage {
    type Surface: Surface;

    fn take_surface(&mut self, element_id: &str) -> Option<Self::Surface>;
}

impl<S: Surface> HostPage for HashMap<String, S> {
    type Surface = S;

    fn take_surface(&mut self, element_id: &str) -> Option<S> {
        self.remove(element_id)
    }
}

/// Values per slot name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Datasets {
    pub bar: Vec<f64>,
    pub donut: Vec<f64>,
    pub bar2: Vec<f64>,
}

impl Default for Datasets {
    fn default() -> Self {
        Self {
            bar: DEFAULT_BAR.to_vec(),
            donut: DEFAULT_DONUT.to_vec(),
            bar2: DEFAULT_BAR2.to_vec(),
        }
    }
}

impl Datasets {
    fn for_slot(&self, name: &str) -> &[f64] {
        match name {
            "bar" => &self.bar,
            "donut" => &self.donut,
            _ => &self.bar2,
        }
    }
}

pub struct MountedChart<S> {
    pub element_id: String,
    pub kind: ChartKind,
    pub values: Vec<f64>,
    pub surface: S,
}

impl<S: Surface> MountedChart<S> {
    fn render(&mut self, progress: f64, palette: &Palette, label: &str) {
        match self.kind {
            ChartKind::Bar => draw_bar_chart(&mut self.surface, &self.values, progress),
            ChartKind::Donut => {
                draw_donut(&mut self.surface, &self.values, progress, palette, label)
            }
        }
    }
}

/// Every chart found on the page plus the shared reveal timeline.
pub struct ChartPage<S> {
    charts: Vec<MountedChart<S>>,
    animation: RevealAnimation,
    palette: Palette,
    label: String,
}

impl<S: Surface> ChartPage<S> {
    /// Resolve each slot against the host. Slots without a surface are
    /// skipped; a page with none is inert.
    pub fn mount<H>(
        host: &mut H,
        datasets: &Datasets,
        palette: Palette,
        label: impl Into<String>,
        duration_ms: f64,
    ) -> Self
    where
        H: HostPage<Surface = S>,
    {
        let mut charts = Vec::new();
        for slot in SLOTS {
            let found = slot
                .element_ids
                .iter()
                .find_map(|id| host.take_surface(id).map(|surface| (*id, surface)));
            match found {
                Some((id, surface)) => {
                    log::debug!("mounted {} chart on #{id}", slot.name);
                    charts.push(MountedChart {
                        element_id: id.to_string(),
                        kind: slot.kind,
                        values: datasets.for_slot(slot.name).to_vec(),
                        surface,
                    });
                }
                None => log::debug!("no surface for {} chart", slot.name),
            }
        }
        log::info!("Mounted {} chart(s)", charts.len());

        Self {
            charts,
            animation: RevealAnimation::new(duration_ms),
            palette,
            label: label.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn charts(&self) -> &[MountedChart<S>] {
        &self.charts
    }

    pub fn animation(&self) -> &RevealAnimation {
        &self.animation
    }

    pub fn surface_mut(&mut self, element_id: &str) -> Option<&mut S> {
        self.charts
            .iter_mut()
            .find(|c| c.element_id == element_id)
            .map(|c| &mut c.surface)
    }

    /// Kick off the first reveal.
    pub fn start(&mut self) {
        self.restart();
    }

    /// The host layout changed: size the backing stores again and replay the
    /// reveal from zero.
    pub fn on_resize(&mut self) {
        log::debug!("resize: restarting reveal");
        self.restart();
    }

    fn restart(&mut self) {
        if self.is_empty() {
            return;
        }
        for chart in &mut self.charts {
            resize_surface(&mut chart.surface);
        }
        self.animation.restart();
    }

    /// Render every chart for the frame at `now_ms`.
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        let charts = &mut self.charts;
        let palette = &self.palette;
        let label = self.label.as_str();
        self.animation.frame(now_ms, |progress| {
            for chart in charts.iter_mut() {
                chart.render(progress, palette, label);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::RevealState;
    use crate::charts::{RecordingSurface, Shape};

    fn host(ids: &[&str]) -> HashMap<String, RecordingSurface> {
        ids.iter()
            .map(|id| (id.to_string(), RecordingSurface::new(300.0, 150.0, Some(2.0))))
            .collect()
    }

    fn mount(ids: &[&str]) -> ChartPage<RecordingSurface> {
        ChartPage::mount(
            &mut host(ids),
            &Datasets::default(),
            Palette::default(),
            "Allocation",
            700.0,
        )
    }

    fn bar_heights(surface: &RecordingSurface) -> Vec<f64> {
        surface
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::RoundRect { rect, .. } => Some(rect.height),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_page_is_a_no_op() {
        let mut page = mount(&[]);
        assert!(page.is_empty());

        page.start();
        page.on_resize();
        assert_eq!(page.frame(0.0), FrameOutcome::Idle);
        assert_eq!(page.animation().state(), RevealState::Idle);
    }

    #[test]
    fn test_resolves_aliases_and_subsets() {
        let page = mount(&["chartBar1", "donutChart"]);
        let ids: Vec<_> = page.charts().iter().map(|c| c.element_id.as_str()).collect();
        assert_eq!(ids, vec!["chartBar1", "donutChart"]);
        assert_eq!(page.charts()[1].kind, ChartKind::Donut);
        assert_eq!(page.charts()[1].values, DEFAULT_DONUT.to_vec());

        let page = mount(&["chartBar", "chartBar1", "chartBar2"]);
        let ids: Vec<_> = page.charts().iter().map(|c| c.element_id.as_str()).collect();
        assert_eq!(ids, vec!["chartBar", "chartBar2"]);
        assert_eq!(page.charts()[1].values, DEFAULT_BAR2.to_vec());
    }

    #[test]
    fn test_start_resizes_and_first_frame_is_flat() {
        let mut page = mount(&["chartBar"]);
        page.start();
        assert_eq!(page.charts()[0].surface.backing, (600, 300));

        assert_eq!(page.frame(16.0), FrameOutcome::Continue);
        let heights = bar_heights(&page.charts()[0].surface);
        assert_eq!(heights.len(), DEFAULT_BAR.len() * 2);
        assert!(heights.iter().all(|h| *h == 0.0));
    }

    #[test]
    fn test_resize_replays_reveal_after_settling() {
        let mut page = mount(&["chartBar", "chartDonut"]);
        page.start();
        page.frame(0.0);
        assert_eq!(page.frame(700.0), FrameOutcome::Finished);
        assert!(bar_heights(&page.charts()[0].surface)
            .iter()
            .any(|h| *h > 0.0));

        page.surface_mut("chartBar").unwrap().logical = (400.0, 200.0);
        page.on_resize();
        assert_eq!(page.charts()[0].surface.backing, (800, 400));
        assert!(matches!(
            page.animation().state(),
            RevealState::Animating { .. }
        ));

        assert_eq!(page.frame(5000.0), FrameOutcome::Continue);
        assert!(bar_heights(&page.charts()[0].surface)
            .iter()
            .all(|h| *h == 0.0));
        let donut = &page.charts()[1].surface;
        assert_eq!(donut.shapes.len(), 1, "only the label at progress 0");

        assert_eq!(page.frame(5700.0), FrameOutcome::Finished);
        let donut = &page.charts()[1].surface;
        assert_eq!(
            donut
                .shapes
                .iter()
                .filter(|s| matches!(s, Shape::Arc { .. }))
                .count(),
            DEFAULT_DONUT.len()
        );
    }
}
