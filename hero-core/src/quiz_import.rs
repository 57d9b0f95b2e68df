use hero_types::QuizQuestion;

/// Questions are saved to the authority in batches of this size.
pub const BULK_CHUNK_SIZE: usize = 5;
pub const DEFAULT_QUESTION_ICON: &str = "❓";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub questions: Vec<QuizQuestion>,
    pub rejected: Vec<RejectedLine>,
}

impl ImportReport {
    pub fn chunks(&self) -> impl Iterator<Item = &[QuizQuestion]> {
        self.questions.chunks(BULK_CHUNK_SIZE)
    }
}

/// Parses `question|opt1|opt2|opt3|opt4|answer|icon` lines. Blank lines and
/// lines starting with `#` are skipped.
pub fn parse_bulk_questions(input: &str) -> ImportReport {
    let mut report = ImportReport::default();

    for (index, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Ok(question) => report.questions.push(question),
            Err(reason) => report.rejected.push(RejectedLine {
                line: index + 1,
                reason,
            }),
        }
    }

    report
}

fn parse_line(line: &str) -> Result<QuizQuestion, String> {
    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    if parts.len() < 6 {
        return Err(format!("expected at least 6 fields, found {}", parts.len()));
    }
    if parts[0].is_empty() {
        return Err("question text is empty".to_string());
    }

    let answer: u32 = parts[5]
        .parse()
        .map_err(|_| format!("answer '{}' is not a number", parts[5]))?;

    let question = QuizQuestion {
        id: String::new(),
        prompt: parts[0].to_string(),
        option1: parts[1].to_string(),
        option2: parts[2].to_string(),
        option3: parts[3].to_string(),
        option4: parts[4].to_string(),
        correct_index: answer,
        icon: parts
            .get(6)
            .filter(|icon| !icon.is_empty())
            .unwrap_or(&DEFAULT_QUESTION_ICON)
            .to_string(),
    };

    let option_count = question.options().len();
    if option_count < 2 {
        return Err("needs at least two options".to_string());
    }
    if answer as usize >= option_count {
        return Err(format!("answer {answer} does not match one of {option_count} options"));
    }

    Ok(question)
}
