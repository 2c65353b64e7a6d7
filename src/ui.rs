use crate::config::Locale;
use crate::summary::{DisplayDay, DisplaySummary};
use crate::view::{PendingGoalButton, View};

const FREQUENCY_EMOJIS: [&str; 7] = ["🥱", "🙂", "😎", "😜", "🤨", "🤯", "🔥"];
const DEFAULT_FREQUENCY: usize = 3;

/// Fixed page text for one locale.
struct Texts {
    lang: &'static str,
    loading: &'static str,
    empty: &'static str,
    register_goal: &'static str,
    you_completed: &'static str,
    of: &'static str,
    goals_this_week: &'static str,
    your_week: &'static str,
    no_completions: &'static str,
    at: &'static str,
    undo: &'static str,
    dialog_description: &'static str,
    activity_label: &'static str,
    activity_placeholder: &'static str,
    frequency_legend: &'static str,
    frequencies: [&'static str; 7],
    close: &'static str,
    save: &'static str,
}

const EN: Texts = Texts {
    lang: "en",
    loading: "Loading your goals...",
    empty: "You have not registered any goal yet. How about registering one right now?",
    register_goal: "Register goal",
    you_completed: "You completed",
    of: "of",
    goals_this_week: "goals this week.",
    your_week: "Your week",
    no_completions: "You have not completed any goal this week yet.",
    at: "at",
    undo: "Undo",
    dialog_description: "Add activities that are good for you and that you want to keep practicing every week.",
    activity_label: "What is the activity?",
    activity_placeholder: "Exercise, meditate, etc...",
    frequency_legend: "How many times a week?",
    frequencies: [
        "1x a week",
        "2x a week",
        "3x a week",
        "4x a week",
        "5x a week",
        "6x a week",
        "Every day of the week",
    ],
    close: "Close",
    save: "Save",
};

const PT_BR: Texts = Texts {
    lang: "pt-BR",
    loading: "Carregando suas metas...",
    empty: "Você ainda não cadastrou nenhuma meta, que tal cadastrar uma agora mesmo?",
    register_goal: "Cadastrar meta",
    you_completed: "Você completou",
    of: "de",
    goals_this_week: "metas nessa semana.",
    your_week: "Sua semana",
    no_completions: "Você ainda não completou nenhuma meta essa semana.",
    at: "às",
    undo: "Desfazer",
    dialog_description: "Adicione atividades que te fazem bem e que você quer continuar praticando toda semana.",
    activity_label: "Qual a atividade?",
    activity_placeholder: "Praticar exercícios, meditar, etc...",
    frequency_legend: "Quantas vezes na semana?",
    frequencies: [
        "1x na semana",
        "2x na semana",
        "3x na semana",
        "4x na semana",
        "5x na semana",
        "6x na semana",
        "Todos dias da semana",
    ],
    close: "Fechar",
    save: "Salvar",
};

fn texts(locale: Locale) -> &'static Texts {
    match locale {
        Locale::En => &EN,
        Locale::PtBr => &PT_BR,
    }
}

pub fn render_page(
    view: &View,
    pending: &[PendingGoalButton],
    week_label: &str,
    locale: Locale,
) -> String {
    let texts = texts(locale);
    let (refresh, body) = match view {
        View::Loading => (
            r#"<meta http-equiv="refresh" content="1" />"#,
            format!(r#"<p class="loading">{}</p>"#, texts.loading),
        ),
        View::EmptyGoals => ("", render_empty_goals(texts)),
        View::Summary(summary) => ("", render_summary(summary, pending, week_label, texts)),
    };

    // Body carries user text, so it is substituted last.
    PAGE_HTML
        .replace("{{LANG}}", texts.lang)
        .replace("{{REFRESH}}", refresh)
        .replace("{{VIEW}}", view.name())
        .replace("{{CREATE_GOAL}}", &render_create_goal(texts))
        .replace("{{BODY}}", &body)
}

fn render_empty_goals(texts: &Texts) -> String {
    format!(
        r#"<section class="empty">
      <p>{}</p>
      <button type="button" class="primary" data-open-create-goal>+ {}</button>
    </section>"#,
        texts.empty, texts.register_goal,
    )
}

fn render_summary(
    summary: &DisplaySummary,
    pending: &[PendingGoalButton],
    week_label: &str,
    texts: &Texts,
) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        r#"<header class="week">
      <span class="week-label">{}</span>
      <button type="button" class="primary" data-open-create-goal>+ {}</button>
    </header>
    <section class="progress">
      <div class="bar"><div class="indicator" style="width: {pct}%"></div></div>
      <div class="progress-text">
        <span>{} <strong>{}</strong> {} <strong>{}</strong> {}</span>
        <span id="percentage">{pct}%</span>
      </div>
    </section>
    <hr />"#,
        escape_html(week_label),
        texts.register_goal,
        texts.you_completed,
        summary.completed,
        texts.of,
        summary.total,
        texts.goals_this_week,
        pct = summary.completed_percentage,
    ));

    html.push_str(&render_pending(pending));
    html.push_str(&format!(r#"<section class="days"><h2>{}</h2>"#, texts.your_week));
    if summary.days.is_empty() {
        html.push_str(&format!(r#"<p class="muted">{}</p>"#, texts.no_completions));
    } else {
        for day in &summary.days {
            html.push_str(&render_day(day, texts));
        }
    }
    html.push_str("</section>");
    html
}

fn render_pending(pending: &[PendingGoalButton]) -> String {
    let mut html = String::from(r#"<section class="pending">"#);
    for goal in pending {
        html.push_str(&format!(
            r#"<form method="post" action="/completions">
        <input type="hidden" name="goalId" value="{}" />
        <button type="submit" class="outline"{}>+ {}</button>
      </form>"#,
            escape_html(&goal.id),
            if goal.disabled { " disabled" } else { "" },
            escape_html(&goal.title),
        ));
    }
    html.push_str("</section>");
    html
}

fn render_day(day: &DisplayDay, texts: &Texts) -> String {
    let mut html = format!(
        r#"<div class="day">
      <h3><span class="weekday">{}</span> <span class="muted">({})</span></h3>
      <ul>"#,
        escape_html(&day.weekday_label),
        escape_html(&day.date_label),
    );
    for entry in &day.entries {
        html.push_str(&format!(
            r#"<li>
          <span>{you_completed} "<strong title="{title}">{title}</strong>" {at} <strong>{time}</strong></span>
          <form method="post" action="/completions/{id}/undo"><button type="submit" class="link">{undo}</button></form>
        </li>"#,
            you_completed = texts.you_completed,
            at = texts.at,
            undo = texts.undo,
            title = escape_html(&entry.title),
            time = escape_html(&entry.time_label),
            id = escape_html(&urlencoding::encode(&entry.id)),
        ));
    }
    html.push_str("</ul></div>");
    html
}

fn render_create_goal(texts: &Texts) -> String {
    let options: String = texts
        .frequencies
        .iter()
        .zip(FREQUENCY_EMOJIS)
        .enumerate()
        .map(|(index, (label, emoji))| {
            let value = index + 1;
            format!(
                r#"<label class="radio"><input type="radio" name="desiredWeeklyFrequency" value="{value}"{checked} /><span>{label}</span><span>{emoji}</span></label>"#,
                checked = if value == DEFAULT_FREQUENCY { " checked" } else { "" },
            )
        })
        .collect();

    format!(
        r#"<dialog id="create-goal">
    <form method="post" action="/goals">
      <h2>{register_goal}</h2>
      <p class="muted">{description}</p>
      <label for="title">{activity_label}</label>
      <input id="title" name="title" maxlength="35" required placeholder="{placeholder}" />
      <fieldset>
        <legend>{legend}</legend>
        {options}
      </fieldset>
      <div class="dialog-actions">
        <button type="button" class="secondary" data-close-create-goal>{close}</button>
        <button type="submit" class="primary">{save}</button>
      </div>
    </form>
  </dialog>"#,
        register_goal = texts.register_goal,
        description = texts.dialog_description,
        activity_label = texts.activity_label,
        placeholder = texts.activity_placeholder,
        legend = texts.frequency_legend,
        close = texts.close,
        save = texts.save,
    )
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="{{LANG}}">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  {{REFRESH}}
  <title>in.orbit</title>
  <style>
    :root {
      --bg: #09090b;
      --ink: #f4f4f5;
      --muted: #a1a1aa;
      --line: #27272a;
      --accent: #8b5cf6;
      --accent-2: #ec4899;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: Inter, "Segoe UI", sans-serif;
    }

    main {
      max-width: 480px;
      margin: 0 auto;
      padding: 40px 20px;
      display: flex;
      flex-direction: column;
      gap: 24px;
    }

    .loading {
      min-height: 100vh;
      display: grid;
      place-items: center;
      margin: 0;
    }

    .empty {
      min-height: 80vh;
      display: flex;
      flex-direction: column;
      align-items: center;
      justify-content: center;
      gap: 20px;
      text-align: center;
      color: var(--muted);
    }

    .week {
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    .week-label {
      font-size: 1.1rem;
      font-weight: 600;
    }

    .bar {
      height: 8px;
      border-radius: 999px;
      background: var(--line);
      overflow: hidden;
    }

    .indicator {
      height: 100%;
      background: linear-gradient(90deg, var(--accent), var(--accent-2));
    }

    .progress-text {
      display: flex;
      justify-content: space-between;
      margin-top: 12px;
      font-size: 0.75rem;
      color: var(--muted);
    }

    .progress-text strong {
      color: var(--ink);
      font-weight: 400;
    }

    hr {
      border: none;
      border-top: 1px solid var(--line);
      width: 100%;
    }

    .pending {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }

    .days ul {
      list-style: none;
      padding: 0;
      display: flex;
      flex-direction: column;
      gap: 12px;
    }

    .days li {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
      font-size: 0.875rem;
      color: var(--muted);
    }

    .days li strong {
      color: var(--ink);
      font-weight: 400;
    }

    .weekday {
      text-transform: capitalize;
    }

    .muted {
      color: var(--muted);
      font-size: 0.8rem;
    }

    button {
      border-radius: 8px;
      padding: 8px 16px;
      font-size: 0.875rem;
      font-weight: 500;
      cursor: pointer;
      border: none;
    }

    button.primary {
      background: var(--accent);
      color: white;
    }

    button.secondary {
      background: var(--line);
      color: var(--ink);
    }

    button.outline {
      background: transparent;
      color: var(--muted);
      border: 1px dashed var(--line);
      border-radius: 999px;
    }

    button.outline:disabled {
      opacity: 0.5;
      cursor: not-allowed;
    }

    button.link {
      background: none;
      color: #71717a;
      text-decoration: underline;
      padding: 0 8px;
    }

    dialog {
      background: var(--bg);
      color: var(--ink);
      border: none;
      border-left: 1px solid var(--line);
      margin: 0 0 0 auto;
      height: 100vh;
      max-height: 100vh;
      width: 400px;
      padding: 32px;
    }

    dialog form {
      display: flex;
      flex-direction: column;
      gap: 16px;
    }

    dialog input[type="text"], dialog input:not([type]) {
      background: black;
      color: var(--ink);
      border: 1px solid var(--line);
      border-radius: 8px;
      padding: 12px;
    }

    fieldset {
      border: none;
      padding: 0;
      display: flex;
      flex-direction: column;
      gap: 8px;
    }

    .radio {
      display: flex;
      justify-content: space-between;
      gap: 8px;
      background: black;
      border: 1px solid var(--line);
      border-radius: 8px;
      padding: 12px;
    }

    .dialog-actions {
      display: flex;
      gap: 12px;
    }

    .dialog-actions button {
      flex: 1;
    }
  </style>
</head>
<body data-view="{{VIEW}}">
  <main>
    {{BODY}}
  </main>
  {{CREATE_GOAL}}
  <script>
    const dialog = document.getElementById('create-goal');
    document.querySelectorAll('[data-open-create-goal]').forEach((button) => {
      button.addEventListener('click', () => dialog.showModal());
    });
    document.querySelectorAll('[data-close-create-goal]').forEach((button) => {
      button.addEventListener('click', () => dialog.close());
    });
  </script>
</body>
</html>
"#;
