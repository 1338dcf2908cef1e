use super::*;

impl Converter {
    pub(super) fn render_header<D: Dispatch>(frame: &mut Frame, area: Rect, state: &AppState<D>) {
        let block = Block::default()
            .title(format!(" mediaconv v{} ", state.app_version))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let input = match state.settings.input_path() {
            Some(path) => Span::styled(
                path.display().to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(
                "no file selected, press [I]",
                Style::default().fg(Color::DarkGray),
            ),
        };
        let target = format!("  ->  .{}", state.settings.selected_format());
        let mut spans = vec![
            Span::styled("Input: ", Style::default().fg(Color::Cyan)),
            input,
            Span::styled(target, Style::default().fg(Color::Cyan)),
        ];
        if let Some(preset) = state.settings.selected_preset() {
            spans.push(Span::styled(
                format!("  [{}]", preset),
                Style::default().fg(Color::Magenta),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), rows[0]);

        let selected = match state.settings.mode() {
            Mode::Quick => 0,
            Mode::Advanced => 1,
        };
        render_radio_group(
            &[Mode::Quick.label(), Mode::Advanced.label()],
            selected,
            false,
            rows[1],
            frame.buffer_mut(),
        );
    }

    pub(super) fn render_body<D: Dispatch>(frame: &mut Frame, area: Rect, state: &mut AppState<D>) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(35),
                Constraint::Percentage(35),
            ])
            .split(area);

        Self::render_formats(frame, columns[0], state);
        Self::render_presets(frame, columns[1], state);
        Self::render_fields(frame, columns[2], state);
    }

    fn render_formats<D: Dispatch>(frame: &mut Frame, area: Rect, state: &mut AppState<D>) {
        let selected = state.settings.selected_format().to_string();
        let items: Vec<ListItem> = state
            .format_rows()
            .iter()
            .map(|format| {
                let ext = format.canonical_extension().unwrap_or("-");
                let marker = if ext == selected { "● " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Green)),
                    Span::raw(format!("{:<6}", format.name)),
                    Span::styled(
                        format!(" {}", format.category),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let block = Self::pane_block(Pane::Formats.title(), state.focus == Pane::Formats);
        if items.is_empty() {
            frame.render_widget(
                Paragraph::new("No formats available")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block),
                area,
            );
            return;
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(Self::highlight_style());
        frame.render_stateful_widget(list, area, &mut state.format_list);
    }

    fn render_presets<D: Dispatch>(frame: &mut Frame, area: Rect, state: &mut AppState<D>) {
        let active = state.settings.selected_preset().map(str::to_string);
        let items: Vec<ListItem> = state
            .catalog
            .presets()
            .iter()
            .map(|preset| {
                let marker = if active.as_deref() == Some(preset.name.as_str()) {
                    "● "
                } else {
                    "  "
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(marker, Style::default().fg(Color::Green)),
                        Span::raw(preset.name.clone()),
                        Span::styled(
                            format!(" .{}", preset.settings.format),
                            Style::default().fg(Color::Cyan),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!("    {}", preset.description),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();

        let block = Self::pane_block(Pane::Presets.title(), state.focus == Pane::Presets);
        if items.is_empty() {
            frame.render_widget(
                Paragraph::new("No presets available")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block),
                area,
            );
            return;
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(Self::highlight_style());
        frame.render_stateful_widget(list, area, &mut state.preset_list);
    }

    fn render_fields<D: Dispatch>(frame: &mut Frame, area: Rect, state: &mut AppState<D>) {
        let block = Self::pane_block(Pane::Fields.title(), state.focus == Pane::Fields);

        // Values stay in memory in quick mode, they are just not shown
        if state.settings.mode() == Mode::Quick {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Quick mode: ffmpeg picks the encoder",
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    "settings for the target format.",
                    Style::default().fg(Color::Gray),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("[M]", Style::default().fg(Color::Yellow)),
                    Span::raw(" switch to advanced"),
                ]),
            ];
            frame.render_widget(Paragraph::new(text).block(block), area);
            return;
        }

        let items: Vec<ListItem> = Field::ALL
            .iter()
            .map(|field| {
                let value = state.settings.field(*field);
                let shown = if value.is_empty() {
                    Span::styled("source", Style::default().fg(Color::DarkGray))
                } else {
                    Span::styled(value.to_string(), Style::default().fg(Color::White))
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<15}", field.label()),
                        Style::default().fg(Color::Cyan),
                    ),
                    shown,
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Self::highlight_style());
        frame.render_stateful_widget(list, area, &mut state.field_list);
    }

    pub(super) fn render_progress<D: Dispatch>(frame: &mut Frame, area: Rect, state: &AppState<D>) {
        let phase = state.job.phase();
        let title = match phase {
            JobPhase::Submitting => format!(
                " {} {} ",
                phase.label(),
                SPINNER[(state.tick / 4) as usize % SPINNER.len()]
            ),
            _ => format!(" {} ", phase.label()),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let percentage = state.job.progress().map(|s| s.percentage).unwrap_or(0.0);
        frame.render_widget(EnhancedProgress::new(percentage, ProgressState::from(phase)), rows[0]);

        let details = match state.job.progress() {
            Some(sample) => Line::from(vec![
                Span::styled(
                    format!("{:>5.1}%", sample.percentage),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    "   time {}   speed {}   bitrate {}",
                    sample.time, sample.speed, sample.bitrate
                )),
            ]),
            None if phase == &JobPhase::Submitting => Line::from(Span::styled(
                "Waiting for ffmpeg...",
                Style::default().fg(Color::Yellow),
            )),
            None => Line::from(Span::styled(
                "No conversion running",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(details), rows[1]);
    }

    pub(super) fn render_status<D: Dispatch>(frame: &mut Frame, area: Rect, state: &AppState<D>) {
        let elapsed = state
            .job_started
            .map(|t| format!("  ({:.0}s)", t.elapsed().as_secs_f64()))
            .unwrap_or_default();
        frame.render_widget(
            Paragraph::new(format!(" {}{}", state.status, elapsed))
                .style(Style::default().fg(Color::Gray)),
            area,
        );
    }
}
