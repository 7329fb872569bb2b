use finder_rs::core::DataPoint;
use finder_rs::error::{FinderError, FinderResult};
use finder_rs::interaction::{EventKind, HighlightStyle, Selection, SelectionChange};
use finder_rs::render::{
    AxesPrimitive, CirclePrimitive, EventCallback, HeadlessSurface, PlotSurface, ScatterPrimitive,
    SubscriptionHandle, TextHAlign, TextPrimitive, TextVAlign, Visual, VisualHandle,
};

/// Headless surface whose scatter draws can be made to fail.
#[derive(Debug, Default)]
struct FlakySurface {
    inner: HeadlessSurface,
    fail_points: bool,
}

impl PlotSurface for FlakySurface {
    fn configure_axes(&mut self, axes: &AxesPrimitive) -> FinderResult<()> {
        self.inner.configure_axes(axes)
    }

    fn draw_points(&mut self, points: &ScatterPrimitive) -> FinderResult<VisualHandle> {
        if self.fail_points {
            return Err(FinderError::InvalidData("scatter backend unavailable".to_owned()));
        }
        self.inner.draw_points(points)
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> FinderResult<VisualHandle> {
        self.inner.draw_text(text)
    }

    fn draw_circle(&mut self, circle: &CirclePrimitive) -> FinderResult<VisualHandle> {
        self.inner.draw_circle(circle)
    }

    fn remove_visual(&mut self, handle: VisualHandle) -> bool {
        self.inner.remove_visual(handle)
    }

    fn register_event_handler(
        &mut self,
        kind: EventKind,
        callback: EventCallback,
    ) -> FinderResult<SubscriptionHandle> {
        self.inner.register_event_handler(kind, callback)
    }

    fn unregister_event_handler(&mut self, handle: SubscriptionHandle) -> bool {
        self.inner.unregister_event_handler(handle)
    }

    fn process_next_event(&mut self) -> FinderResult<()> {
        self.inner.process_next_event()
    }
}

fn at(x: f64, y: f64) -> DataPoint {
    DataPoint::new(x, y)
}

#[test]
fn picking_twice_restores_membership_and_visuals() {
    let mut surface = HeadlessSurface::new();
    let mut selection = Selection::default();
    selection
        .pick(&mut surface, 1, at(0.0, 0.0))
        .expect("pick 1");
    let before = surface.live_visual_count();

    let added = selection
        .pick(&mut surface, 4, at(1.0, -1.0))
        .expect("select 4");
    assert_eq!(added, SelectionChange::Added(4));
    assert_eq!(surface.live_visual_count(), before + 2);

    let removed = selection
        .pick(&mut surface, 4, at(1.0, -1.0))
        .expect("deselect 4");
    assert_eq!(removed, SelectionChange::Removed(4));
    assert_eq!(selection.indices(), &[1]);
    assert_eq!(surface.live_visual_count(), before);
}

#[test]
fn highlight_visuals_follow_the_style() {
    let mut surface = HeadlessSurface::new();
    let style = HighlightStyle::default();
    let mut selection = Selection::new(style);
    selection
        .pick(&mut surface, 12, at(2.0, 3.0))
        .expect("select");

    let record = selection.records().next().expect("one record");
    assert_eq!(record.index(), 12);
    assert_eq!(record.position(), at(2.0, 3.0));

    let Some(Visual::Text(label)) = surface.visual(record.label()) else {
        panic!("label should be a text visual");
    };
    assert_eq!(label.text, "[12]");
    assert_eq!(label.font_size_pt, 7.0);
    assert_eq!((label.h_align, label.v_align), (TextHAlign::Center, TextVAlign::Bottom));

    let Some(Visual::Points(ring)) = surface.visual(record.marker()) else {
        panic!("marker should be a scatter visual");
    };
    assert_eq!(ring.fill, None);
    assert_eq!(ring.edge, Some(style.color));
    assert_eq!(ring.pick_radius, None);
    assert_eq!(ring.points[0].size, 100.0);
}

#[test]
fn pair_follows_pick_order_not_index_order() {
    let mut surface = HeadlessSurface::new();
    let mut selection = Selection::default();
    for index in [9, 2, 5] {
        selection
            .pick(&mut surface, index, at(index as f64, 0.0))
            .expect("select");
    }
    assert_eq!(selection.indices(), &[9, 2, 5]);
    assert_eq!(selection.pair(), None);

    selection
        .pick(&mut surface, 2, at(2.0, 0.0))
        .expect("deselect");
    assert_eq!(selection.pair(), Some((9, 5)));
    assert!(selection.contains(5));
    assert!(!selection.contains(2));
}

#[test]
fn failed_marker_draw_leaves_no_partial_record() {
    let mut surface = FlakySurface {
        fail_points: true,
        ..FlakySurface::default()
    };
    let mut selection = Selection::default();

    let err = selection
        .pick(&mut surface, 3, at(0.5, 0.5))
        .expect_err("ring draw fails");

    assert!(matches!(err, FinderError::InvalidData(_)));
    assert!(selection.is_empty());
    assert_eq!(surface.inner.live_visual_count(), 0);

    surface.fail_points = false;
    let change = selection
        .pick(&mut surface, 3, at(0.5, 0.5))
        .expect("retry succeeds");
    assert_eq!(change, SelectionChange::Added(3));
    assert_eq!(surface.inner.live_visual_count(), 2);
}

#[test]
fn clear_releases_every_visual() {
    let mut surface = HeadlessSurface::new();
    let mut selection = Selection::default();
    for index in 0..4 {
        selection
            .pick(&mut surface, index, at(0.0, index as f64))
            .expect("select");
    }
    assert_eq!(surface.live_visual_count(), 8);

    selection.clear(&mut surface);
    assert!(selection.is_empty());
    assert_eq!(selection.records().count(), 0);
    assert_eq!(surface.live_visual_count(), 0);
}
