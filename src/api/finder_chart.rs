use tracing::{debug, info, trace, warn};

use crate::core::{
    DataPoint, OffsetUnit, StarTable, compute_alignment, format_dec_dms, format_ra_hms,
    marker_size, project_offsets,
};
use crate::error::{FinderError, FinderResult};
use crate::interaction::{
    CancelToken, Click, EventBridge, EventKind, INVALID_CLICK_MESSAGE, InteractionMode, KeyEvent,
    PickEvent, PlotEvent, Selection, SelectionChange, WaitOutcome,
};
use crate::render::{
    AxesPrimitive, CirclePrimitive, Color, DisplaySurface, Layout, OutputHandle, PlotSurface,
    ScatterPoint, ScatterPrimitive, TextHAlign, TextPrimitive, TextVAlign,
};

use super::{AlignmentReport, FinderChartConfig, selection_summary_line};

/// Why `FinderChart::interact` handed control back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEnd {
    Cancelled,
    SurfaceClosed,
}

/// Pick-driven state, kept apart from the surfaces so event handlers can
/// borrow it alongside them.
#[derive(Debug)]
struct PickSession {
    table: StarTable,
    offsets: Vec<Option<DataPoint>>,
    selection: Selection,
    output: OutputHandle,
    last_alignment: Option<AlignmentReport>,
    alignment_count: usize,
}

impl PickSession {
    fn on_pick<S, D>(
        &mut self,
        surface: &mut S,
        display: &mut D,
        pick: &PickEvent,
    ) -> FinderResult<Option<SelectionChange>>
    where
        S: PlotSurface + ?Sized,
        D: DisplaySurface + ?Sized,
    {
        if !pick.is_press() {
            trace!(action = ?pick.pointer.action, "ignoring pick that is not a press");
            return Ok(None);
        }
        if pick.pointer.valid_position().is_none() {
            warn!("rejected pick without data coordinates");
            display.write_line(self.output, INVALID_CLICK_MESSAGE)?;
            return Ok(None);
        }
        let Some(index) = pick.first_index() else {
            return Ok(None);
        };
        self.table.row(index)?;
        let position = self
            .offsets
            .get(index)
            .copied()
            .flatten()
            .ok_or_else(|| FinderError::InvalidData(format!("star {index} is not plotted")))?;

        let change = self.selection.pick(surface, index, position)?;
        display.clear_output(self.output)?;

        for record in self.selection.records() {
            let row = self.table.row(record.index())?;
            display.write_line(self.output, &selection_summary_line(record.index(), row))?;
        }

        if let Some((first, second)) = self.selection.pair() {
            let result = compute_alignment(
                self.table.row(first)?.position,
                self.table.row(second)?.position,
            );
            let report = AlignmentReport {
                first,
                second,
                result,
            };
            display.write_line(self.output, "")?;
            display.write_line(self.output, &report.to_string())?;
            info!(
                first,
                second,
                position_angle_deg = ?result.position_angle_deg,
                "computed slit alignment"
            );
            self.alignment_count += 1;
            self.last_alignment = Some(report);
        }

        Ok(Some(change))
    }
}

/// Interactive finder chart: renders a star field, turns picks into a
/// toggled selection, and prints slit-alignment guidance whenever exactly two
/// stars are selected.
pub struct FinderChart<S: PlotSurface, D: DisplaySurface> {
    surface: S,
    display: D,
    config: FinderChartConfig,
    session: PickSession,
    bridge: EventBridge,
    mode: InteractionMode,
}

impl<S: PlotSurface, D: DisplaySurface> FinderChart<S, D> {
    /// Renders the field and shows it with a footer output for guidance text.
    pub fn new(
        mut surface: S,
        mut display: D,
        table: StarTable,
        config: FinderChartConfig,
    ) -> FinderResult<Self> {
        config.validate()?;
        let offsets = project_offsets(table.rows(), table.center(), config.unit)?;

        render_field(&mut surface, &table, &offsets, config)?;
        let output = display.create_output();
        display.show_layout(&Layout {
            right_sidebar: None,
            footer: Some(output),
        })?;
        debug!(
            stars = table.len(),
            plotted = offsets.iter().flatten().count(),
            "rendered finder chart"
        );

        Ok(Self {
            surface,
            display,
            config,
            session: PickSession {
                table,
                offsets,
                selection: Selection::new(config.highlight),
                output,
                last_alignment: None,
                alignment_count: 0,
            },
            bridge: EventBridge::new(),
            mode: InteractionMode::Idle,
        })
    }

    /// Watches pick events until the wait is cancelled or the surface closes.
    ///
    /// The selection survives the call; a later `interact` continues from it.
    pub fn interact(&mut self) -> FinderResult<InteractionEnd> {
        let Self {
            surface,
            display,
            session,
            bridge,
            mode,
            ..
        } = self;

        *mode = InteractionMode::Watching;
        info!("watching finder chart picks");
        let waited = bridge.blocking_wait(surface, &[EventKind::Pick], |surface, event| {
            let PlotEvent::Pick(pick) = event else {
                return Ok(false);
            };
            match session.on_pick(surface, display, pick) {
                Ok(_) => Ok(false),
                Err(err @ FinderError::UnknownPointIndex { .. }) => {
                    warn!(error = %err, "ignoring pick outside the star table");
                    display.write_line(session.output, &format!("ignored pick: {err}"))?;
                    Ok(false)
                }
                Err(err) => Err(err),
            }
        });
        *mode = InteractionMode::Idle;

        match waited {
            Ok(WaitOutcome::Cancelled | WaitOutcome::Completed) => Ok(InteractionEnd::Cancelled),
            Err(FinderError::SurfaceClosed) => {
                info!("finder chart surface closed");
                Ok(InteractionEnd::SurfaceClosed)
            }
            Err(err) => Err(err),
        }
    }

    /// Applies one pick directly, for hosts that run their own event loop.
    pub fn pick(&mut self, pick: &PickEvent) -> FinderResult<Option<SelectionChange>> {
        self.session
            .on_pick(&mut self.surface, &mut self.display, pick)
    }

    /// Blocks until `count` clicks with data coordinates arrive; `None` if cancelled.
    pub fn wait_for_clicks(&mut self, count: usize) -> FinderResult<Option<Vec<Click>>> {
        self.bridge.wait_for_clicks(
            &mut self.surface,
            &mut self.display,
            self.session.output,
            count,
        )
    }

    /// Blocks until a non-modifier key is released; `None` if cancelled.
    pub fn wait_for_key_press(&mut self) -> FinderResult<Option<KeyEvent>> {
        self.bridge
            .wait_for_key_press(&mut self.surface, &mut self.display, self.session.output)
    }

    /// Token that stops the running `interact` or wait.
    ///
    /// A cancel only affects the wait in progress: every new wait re-arms
    /// the token when it starts.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.bridge.cancel_token()
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.session.selection
    }

    #[must_use]
    pub fn last_alignment(&self) -> Option<&AlignmentReport> {
        self.session.last_alignment.as_ref()
    }

    /// Number of times alignment guidance has been computed.
    #[must_use]
    pub fn alignment_count(&self) -> usize {
        self.session.alignment_count
    }

    #[must_use]
    pub fn table(&self) -> &StarTable {
        &self.session.table
    }

    /// Plot offsets per catalog row; `None` for rows that are not plotted.
    #[must_use]
    pub fn offsets(&self) -> &[Option<DataPoint>] {
        &self.session.offsets
    }

    #[must_use]
    pub fn config(&self) -> FinderChartConfig {
        self.config
    }

    #[must_use]
    pub fn output(&self) -> OutputHandle {
        self.session.output
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn display(&self) -> &D {
        &self.display
    }

    #[must_use]
    pub fn into_parts(self) -> (S, D) {
        (self.surface, self.display)
    }
}

fn render_field<S: PlotSurface + ?Sized>(
    surface: &mut S,
    table: &StarTable,
    offsets: &[Option<DataPoint>],
    config: FinderChartConfig,
) -> FinderResult<()> {
    let unit = config.unit;
    let radius = unit.from_degrees(table.radius_deg());
    let center = table.center();

    surface.configure_axes(&AxesPrimitive {
        x_label: axis_label("Right Ascension", unit, &format_ra_hms(center.ra_deg, 2)),
        y_label: axis_label("Declination", unit, &format_dec_dms(center.dec_deg, 2)),
        x_limits: (radius, -radius),
        y_limits: (-radius, radius),
        grid: Some(Color::GRAY.with_alpha(0.2)),
        equal_aspect: true,
    })?;

    let points = table
        .rows()
        .iter()
        .zip(offsets)
        .enumerate()
        .filter_map(|(index, (row, offset))| {
            offset.map(|position| ScatterPoint {
                index,
                position,
                size: marker_size(
                    row.magnitude(config.band),
                    config.faintest_magnitude_to_show,
                    config.size_of_zero_magnitude,
                ),
            })
        })
        .collect();
    surface.draw_points(
        &ScatterPrimitive::filled(points, Color::BLACK).with_pick_radius(config.pick_radius),
    )?;

    let band_label = config.band.label();
    for (row, offset) in table.rows().iter().zip(offsets) {
        let (Some(magnitude), Some(anchor)) = (row.magnitude(config.band), *offset) else {
            continue;
        };
        if magnitude >= config.faintest_magnitude_to_label {
            continue;
        }
        surface.draw_text(
            &TextPrimitive::new(
                format!("  {band_label}={magnitude:.2}"),
                anchor,
                config.label_font_size_pt,
                Color::BLACK,
            )
            .with_alignment(TextHAlign::Left, TextVAlign::Center),
        )?;
    }

    surface.draw_circle(&CirclePrimitive::new(
        DataPoint::new(0.0, 0.0),
        radius,
        2.0,
        Color::GRAY.with_alpha(0.2),
    ))?;
    Ok(())
}

fn axis_label(axis: &str, unit: OffsetUnit, center: &str) -> String {
    format!("Δ({axis}) [{}] relative to {center}", unit.label())
}
