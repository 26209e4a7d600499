use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::{
    app::App,
    difficulty::Difficulty,
    round::{LetterStatus, Phase, RoundState},
};

const HORIZONTAL_MARGIN: u16 = 2;
const GALLOWS_PARTS: u32 = 7;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snap = self.snapshot();
        let round = snap.round;

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(3), // score + difficulty
                    Constraint::Min(9),    // gallows + word
                    Constraint::Length(3), // letter board
                    Constraint::Length(2), // status
                    Constraint::Length(1), // key help
                ]
                .as_ref(),
            )
            .split(area);

        // header
        let difficulties = Difficulty::ALL
            .iter()
            .map(|d| {
                let profile = d.profile();
                let label = format!(" {} ({}) ", profile.name, profile.max_wrong_guesses);
                if profile == snap.selected_difficulty {
                    Span::styled(label, bold_style.fg(Color::Cyan))
                } else {
                    Span::styled(label, dim_style)
                }
            })
            .collect::<Vec<Span>>();
        let mut header = vec![
            Span::styled(format!("Wins: {}", snap.counters.wins), bold_style.fg(Color::Green)),
            Span::raw("   "),
            Span::styled(format!("Losses: {}", snap.counters.losses), bold_style.fg(Color::Red)),
            Span::raw("   "),
        ];
        header.extend(difficulties);
        Paragraph::new(Line::from(header))
            .block(Block::default().borders(Borders::ALL).title(" hangr "))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        // gallows on the left, word and counters on the right
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(14), Constraint::Min(10)].as_ref())
            .split(chunks[1]);

        let stage = gallows_stage(
            round.wrong_count(),
            round.active_difficulty().max_wrong_guesses,
        );
        let figure_color = if round.phase() == Phase::Lost {
            Color::Red
        } else {
            Color::Yellow
        };
        Paragraph::new(
            gallows_lines(stage)
                .into_iter()
                .map(Line::from)
                .collect::<Vec<Line>>(),
        )
        .style(Style::default().fg(figure_color))
        .render(body[0], buf);

        let mut lines = Vec::new();
        match round.phase() {
            Phase::Idle => {
                lines.push(Line::from(Span::styled("Ready when you are", italic_style)));
            }
            Phase::Lost => {
                lines.push(Line::from(Span::styled(
                    round.revealed(),
                    bold_style.fg(Color::Red),
                )));
            }
            Phase::Won => {
                lines.push(Line::from(Span::styled(
                    round.revealed(),
                    bold_style.fg(Color::Green),
                )));
            }
            Phase::Playing => {
                lines.push(Line::from(Span::styled(round.masked(), bold_style)));
            }
        }
        lines.push(Line::default());
        if round.phase() != Phase::Idle {
            lines.push(Line::from(format!(
                "Wrong guesses: {} / {}",
                round.wrong_count(),
                round.active_difficulty().max_wrong_guesses
            )));
        }
        if round.phase() == Phase::Playing {
            lines.push(Line::from(Span::styled(
                format!("Time left: {}s", round.time_remaining()),
                bold_style.fg(timer_color(round.time_remaining())),
            )));
        }
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(body[1], buf);

        Paragraph::new(Line::from(letter_board(round)))
            .block(Block::default().borders(Borders::TOP))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let mut status = vec![Line::from(Span::styled(self.status_line(), bold_style))];
        if let Some(notice) = self.notice() {
            status.push(Line::from(Span::styled(
                notice.to_string(),
                italic_style.fg(Color::Yellow),
            )));
        }
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        let help = if round.phase() == Phase::Playing {
            "a-z guess / (esc) give up / ctrl-c quit"
        } else {
            "(enter) play / (1-3) or (←/→) difficulty / (esc)ape"
        };
        Paragraph::new(Span::styled(help, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }
}

/// How many figure parts to draw. The full figure always appears on the
/// last allowed wrong guess, whatever the limit.
pub fn gallows_stage(wrong: u32, max_wrong: u32) -> u32 {
    if max_wrong == 0 {
        return GALLOWS_PARTS;
    }
    let scaled = (wrong * GALLOWS_PARTS).div_ceil(max_wrong);
    scaled.min(GALLOWS_PARTS)
}

pub fn gallows_lines(stage: u32) -> Vec<String> {
    let part = |n: u32, s: &'static str| if stage >= n { s } else { " " };
    vec![
        "  +---+".to_string(),
        format!("  {}   |", part(1, "|")),
        format!("  {}   |", part(2, "O")),
        format!(" {}{}{}  |", part(4, "/"), part(3, "|"), part(5, "\\")),
        format!(" {} {}  |", part(6, "/"), part(7, "\\")),
        "      |".to_string(),
        "=========".to_string(),
    ]
}

pub fn timer_color(seconds: u32) -> Color {
    if seconds > 40 {
        Color::Green
    } else if seconds > 20 {
        Color::Yellow
    } else if seconds > 10 {
        Color::LightRed
    } else {
        Color::Red
    }
}

fn letter_board(round: &RoundState) -> Vec<Span<'static>> {
    let playing = round.phase() == Phase::Playing;
    ('A'..='Z')
        .map(|c| {
            let style = match round.letter_status(c) {
                LetterStatus::Hit => Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                LetterStatus::Miss => Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::CROSSED_OUT),
                LetterStatus::Unused if playing => Style::default(),
                LetterStatus::Unused => Style::default().add_modifier(Modifier::DIM),
            };
            Span::styled(format!("{c} "), style)
        })
        .collect()
}
