/// Command palette entries and autocomplete logic

/// What a command does once submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  ShowAll,
  PickEmployee,
  LoadMore,
  Refresh,
  Quit,
}

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
  pub action: Action,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "all",
    aliases: &["a", "clear", "everyone"],
    description: "Show transactions of all employees",
    action: Action::ShowAll,
  },
  Command {
    name: "filter",
    aliases: &["f", "employee", "by"],
    description: "Filter by employee",
    action: Action::PickEmployee,
  },
  Command {
    name: "more",
    aliases: &["m", "next", "page"],
    description: "Load the next page",
    action: Action::LoadMore,
  },
  Command {
    name: "refresh",
    aliases: &["r", "reload"],
    description: "Drop cached data and reload",
    action: Action::Refresh,
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit txr",
    action: Action::Quit,
  },
];

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.trim().to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    // Exact match on name
    if cmd.name == input_lower {
      matches.push((cmd, 0)); // Highest priority
      continue;
    }

    // Exact match on alias
    if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
      continue;
    }

    // Prefix match on name
    if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
      continue;
    }

    // Prefix match on alias
    if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((cmd, 3));
      continue;
    }

    // Fuzzy match (contains)
    if cmd.name.contains(&input_lower) {
      matches.push((cmd, 4));
      continue;
    }

    // Fuzzy match on alias
    if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      matches.push((cmd, 5));
    }
  }

  // Stable sort keeps table order within a priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

/// Resolve typed input to a command: the highlighted suggestion if any.
pub fn resolve(input: &str, selected_suggestion: usize) -> Option<&'static Command> {
  get_suggestions(input).get(selected_suggestion).copied()
}
