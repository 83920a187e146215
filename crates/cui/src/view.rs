use crate::app::App;
use cinder_core::{Card, Phase};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(8),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);
    match app.controller.phase() {
        Phase::Loading => draw_notice(
            frame,
            root[1],
            app.locale.text("Loading cats...", "正在加载猫咪数据..."),
            app.locale.text("please wait", "加载中..."),
            Color::White,
        ),
        Phase::Error(message) => draw_notice(
            frame,
            root[1],
            app.locale.text("Could not load the cats", "加载出错了"),
            &format!("{message}  ({})", app.locale.text("r retry", "r 重试")),
            Color::Red,
        ),
        Phase::Ready if app.controller.stack().is_empty() => draw_notice(
            frame,
            root[1],
            app.locale.text("Preparing...", "准备中..."),
            app.locale.text("new cats are on their way", "正在为您准备新的猫咪"),
            Color::Yellow,
        ),
        Phase::Ready => draw_cards(frame, root[1], app),
    }
    draw_events(frame, root[2], app);

    if app.show_help {
        draw_help_popup(frame, app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        "Cinder | {} | {}: {}",
        app.locale.text("Please like my cats", "请喜欢我的猫咪"),
        app.locale.text("Hint", "提示"),
        app.next_hint()
    );
    let summary = format!(
        "{}: {}  {}: {}  {}: {}  {}: {}",
        app.locale.text("Liked", "已喜欢"),
        app.controller.liked_count(),
        app.locale.text("Round", "轮次"),
        app.controller.round(),
        app.locale.text("Left", "剩余"),
        app.controller.stack().len(),
        app.locale.text("Seed", "种子"),
        app.controller.seed(),
    );
    let lines = vec![
        Line::from(title.bold()),
        Line::from(summary),
        Line::from(format!(
            "{}: {}",
            app.locale.text("Status", "状态"),
            app.status_line
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Cinder", "Cinder"));
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

fn draw_notice(frame: &mut Frame, area: Rect, title: &str, detail: &str, color: Color) {
    let area = centered_rect(60, 40, area);
    let lines = vec![
        Line::from(title.to_string().bold()),
        Line::from(""),
        Line::from(detail.to_string()),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn draw_cards(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);
    let visible = app.controller.visible_cards();
    let (back, front) = match visible {
        [back, front] => (Some(back), front),
        [front] => (None, front),
        _ => return,
    };
    if let Some(back) = back {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(app.locale.text("Next", "下一只"))
            .border_style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(
            Paragraph::new(card_lines(app, back, false))
                .style(Style::default().add_modifier(Modifier::DIM))
                .wrap(Wrap { trim: true })
                .block(block),
            columns[0],
        );
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} {}", front.entity.name, front.render_id))
        .border_style(Style::default().fg(Color::Magenta));
    frame.render_widget(
        Paragraph::new(card_lines(app, front, true))
            .wrap(Wrap { trim: true })
            .block(block),
        columns[1],
    );
}

fn card_lines(app: &App, card: &Card, front: bool) -> Vec<Line<'static>> {
    let entity = &card.entity;
    let image = if front {
        app.carousel.current(card)
    } else {
        card.image_path()
    };
    let mut lines = vec![
        Line::from(entity.name.clone().bold()),
        Line::from(format!(
            "{}{} • {}",
            entity.age,
            app.locale.text(" yrs", "岁"),
            entity.category
        )),
        Line::from(""),
        Line::from(entity.description.clone()),
        Line::from(""),
    ];
    match image {
        Some(path) => lines.push(Line::from(format!(
            "{}: {path}",
            app.locale.text("Photo", "照片")
        ))),
        None => lines.push(Line::from(
            app.locale
                .text("(no photo)", "（暂无照片）")
                .to_string()
                .italic(),
        )),
    }
    if front && entity.image_count() > 1 {
        let (index, total) = app.carousel.position(card);
        lines.push(Line::from(format!("[{index}/{total}]").cyan()));
        lines.push(Line::from(
            app.locale
                .text("space: see more photos", "空格键查看更多照片")
                .to_string()
                .dark_gray(),
        ));
    }
    lines
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let capacity = area.height.saturating_sub(2) as usize;
    let start = app.event_log.len().saturating_sub(capacity);
    let lines: Vec<Line<'_>> = app
        .event_log
        .iter()
        .skip(start)
        .map(|line| Line::from(line.clone()))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Events", "事件"));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help_popup(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(app.locale.text(
            "-> / l / enter  like the front cat",
            "-> / l / 回车  喜欢当前猫咪",
        )),
        Line::from(app.locale.text(
            "space / n  next photo of the front cat",
            "空格 / n  查看下一张照片",
        )),
        Line::from(app.locale.text(
            "r  reset (retry after a load error)",
            "r  重置（加载出错时重试）",
        )),
        Line::from(
            app.locale
                .text("? help | esc close | q quit", "? 帮助 | esc 关闭 | q 退出"),
        ),
    ];
    let block = Block::default()
        .title(app.locale.text("Help", "帮助"))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
