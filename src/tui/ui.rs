use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::core::deck::Deck;
use crate::core::state::SectionPosition;
use crate::nav::carousel::CarouselState;
use crate::nav::indicator::NavIndicator;
use crate::tui::component::Component;
use crate::tui::components::{Backdrop, BackdropFrame, Header, Pill, SectionPanel, Splash};
use crate::tui::view::DeckView;

/// Columns kept free on the right for the pill.
const PILL_GUTTER: u16 = 14;

/// Everything one frame needs.
pub struct Scene<'a> {
    pub deck: &'a Deck,
    pub view: &'a mut DeckView,
    pub indicator: &'a mut NavIndicator,
    /// Host section and position of the carousel.
    pub carousel: Option<(usize, CarouselState)>,
    pub backdrop: Option<&'a Backdrop>,
    pub splash: Option<&'a mut Splash>,
    pub now: Instant,
}

/// Splits the screen into header and main area.
pub fn screen_layout(area: Rect, condensed: bool) -> (Rect, Rect) {
    use Constraint::{Length, Min};
    let [header, main] = Layout::vertical([Length(Header::height(condensed)), Min(0)]).areas(area);
    (header, main)
}

/// Screen rectangle of the pill for the current frame.
pub fn pill_area(frame_area: Rect, condensed: bool, indicator: &NavIndicator) -> Rect {
    let (_, main) = screen_layout(frame_area, condensed);
    Pill::layout(
        main,
        indicator.marker_count(),
        Pill::label_width(indicator.label()),
    )
}

pub fn draw_ui(frame: &mut Frame, scene: Scene) {
    let area = frame.area();

    if let Some(splash) = scene.splash {
        frame.render_widget(Clear, area);
        splash.render(frame, area);
        return;
    }

    let condensed = scene.view.header_condensed();
    let (header_area, main_area) = screen_layout(area, condensed);
    let shown = scene.view.shown().unwrap_or(0);
    let section_name = scene
        .deck
        .sections
        .get(shown)
        .map(|s| s.name.clone())
        .unwrap_or_default();
    Header::new(scene.deck.title.clone(), section_name, condensed).render(frame, header_area);

    if let Some(backdrop) = scene.backdrop
        && backdrop.owner() == shown
        && let Some(index) = backdrop.frame_at(scene.now)
    {
        BackdropFrame { frame: index }.render(frame, main_area);
    }

    draw_section(frame, main_area, scene.deck, scene.view, scene.carousel, shown);

    let pill = pill_area(area, condensed, scene.indicator);
    let mut widget = Pill::new(
        scene.indicator.marker_count(),
        scene.indicator.active(),
        scene.indicator.label().to_string(),
    );
    if let Some(swap) = scene.indicator.swap(scene.now) {
        let progress = swap.progress(scene.now);
        widget = widget.with_swap(swap.clone(), progress);
    }
    widget.render(frame, pill);

    draw_overlay(frame, area, scene.view.overlay_opacity(scene.now));
}

fn draw_section(
    frame: &mut Frame,
    area: Rect,
    deck: &Deck,
    view: &mut DeckView,
    carousel: Option<(usize, CarouselState)>,
    shown: usize,
) {
    let content = Rect {
        width: area.width.saturating_sub(PILL_GUTTER),
        ..area
    }
    .inner(Margin::new(2, 1));
    let [body_area, hint_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(content);

    frame.render_widget(position_hint(view), hint_area);

    let carousel = carousel
        .filter(|(section, _)| *section == shown)
        .map(|(_, state)| state);
    if let (Some(spec), Some(panel)) = (deck.sections.get(shown), view.panel_mut(shown)) {
        SectionPanel::new(spec, panel)
            .with_carousel(carousel)
            .render(frame, body_area);
    }
}

/// "▴ 1 above · ▾ 1 below", from the sections' positions.
fn position_hint(view: &DeckView) -> Paragraph<'static> {
    let above = view
        .panels()
        .iter()
        .filter(|p| p.position == SectionPosition::Above)
        .count();
    let below = view
        .panels()
        .iter()
        .filter(|p| p.position == SectionPosition::Below)
        .count();
    let mut parts = Vec::new();
    if above > 0 {
        parts.push(format!("▴ {above} above"));
    }
    if below > 0 {
        parts.push(format!("▾ {below} below"));
    }
    Paragraph::new(Line::from(parts.join(" · ")))
        .style(Style::default().fg(Color::DarkGray))
        .right_aligned()
}

/// Dims the screen as the overlay fades in; fully opaque hides everything.
fn draw_overlay(frame: &mut Frame, area: Rect, opacity: f32) {
    if opacity >= 0.99 {
        frame.render_widget(Clear, area);
        frame.render_widget(Block::new().style(Style::default().bg(Color::Black)), area);
    } else if opacity > 0.5 {
        frame
            .buffer_mut()
            .set_style(area, Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM));
    } else if opacity > 0.01 {
        frame
            .buffer_mut()
            .set_style(area, Style::default().add_modifier(Modifier::DIM));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::player::{OverlayFade, SectionSurface};
    use crate::tui::view::SharedView;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn render(
        deck: &Deck,
        view: &mut DeckView,
        indicator: &mut NavIndicator,
        splash: Option<&mut Splash>,
    ) -> String {
        let backend = TestBackend::new(90, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                draw_ui(
                    f,
                    Scene {
                        deck,
                        view,
                        indicator,
                        carousel: None,
                        backdrop: None,
                        splash,
                        now: Instant::now(),
                    },
                )
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_first_section_scene() {
        let deck = Deck::builtin();
        let mut view = DeckView::new(&deck);
        let mut indicator = NavIndicator::new(deck.section_names());
        let text = render(&deck, &mut view, &mut indicator, None);
        assert!(text.contains("Full-page navigation"));
        assert!(text.contains("▾ 2 below"));
        assert!(text.contains("██"));
        assert!(text.contains("Home"));
    }

    #[test]
    fn test_splash_hides_the_deck() {
        let deck = Deck::builtin();
        let mut view = DeckView::new(&deck);
        let mut indicator = NavIndicator::new(deck.section_names());
        let started = Instant::now() - Duration::from_millis(1500);
        let mut splash = Splash::new(deck.title.clone(), started).at(Instant::now());
        let text = render(&deck, &mut view, &mut indicator, Some(&mut splash));
        assert!(text.contains("decknav"));
        assert!(!text.contains("Full-page navigation"));
        assert!(!text.contains("██"));
    }

    #[test]
    fn test_opaque_overlay_covers_everything() {
        let deck = Deck::builtin();
        let shared = SharedView::new(DeckView::new(&deck));
        shared.fade_overlay(OverlayFade::ToOpaque, Duration::ZERO);
        let mut view = shared.lock();
        let mut indicator = NavIndicator::new(deck.section_names());
        let text = render(&deck, &mut view, &mut indicator, None);
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_pill_area_sits_right_of_main() {
        let indicator = NavIndicator::new(vec!["A".into(), "B".into(), "C".into()]);
        let frame = Rect::new(0, 0, 90, 30);
        let pill = pill_area(frame, false, &indicator);
        let (_, main) = screen_layout(frame, false);
        assert_eq!(pill.right() + 1, main.right());
        assert!(pill.y > main.y);
        assert_eq!(pill.height, 5);
    }

    #[test]
    fn test_condensed_header_gives_main_more_rows() {
        let frame = Rect::new(0, 0, 90, 30);
        let (_, tall) = screen_layout(frame, true);
        let (_, short) = screen_layout(frame, false);
        assert_eq!(tall.height, short.height + 1);
    }
}
