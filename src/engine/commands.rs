// Readtrack Engine — Command Surface
//
// Pure text → Command parse, decoupled from the handler so dispatch is
// testable without the hosting runtime. Matching is case-sensitive,
// verbatim or by prefix, in a fixed order — first match wins. Anything
// unrecognized is not a command and falls through to attribution.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    QueryReadMembers,
    QueryUnreadMembers,
    ResetRecords,
    ConfirmReset,
    ShowRoster,
    ReloadRoster,
    /// Diagnostic: record a read for the named member as if they had sent
    /// the keyword themselves.
    TestRecord(String),
    ShowWhitelist,
    AddWhitelist(String),
    RemoveWhitelist(String),
    ClearWhitelist,
    AddThisGroup,
    RemoveThisGroup,
    WhitelistHelp,
    Help,
}

/// Parse a trimmed message into a command, or None if it is ordinary chat.
pub fn parse_command(text: &str) -> Option<Command> {
    match text {
        "query read members" => return Some(Command::QueryReadMembers),
        "query unread members" => return Some(Command::QueryUnreadMembers),
        "reset records" => return Some(Command::ResetRecords),
        "confirm reset" => return Some(Command::ConfirmReset),
        "show roster" => return Some(Command::ShowRoster),
        "reload roster" => return Some(Command::ReloadRoster),
        "show whitelist" => return Some(Command::ShowWhitelist),
        "clear whitelist" => return Some(Command::ClearWhitelist),
        "add this group to whitelist" => return Some(Command::AddThisGroup),
        "remove this group from whitelist" => return Some(Command::RemoveThisGroup),
        "whitelist help" => return Some(Command::WhitelistHelp),
        "help" => return Some(Command::Help),
        _ => {}
    }

    if let Some(rest) = text.strip_prefix("test record ") {
        let name = rest.trim();
        if !name.is_empty() {
            return Some(Command::TestRecord(name.to_string()));
        }
    }
    if let Some(rest) = text.strip_prefix("add whitelist") {
        return Some(Command::AddWhitelist(rest.trim().to_string()));
    }
    if let Some(rest) = text.strip_prefix("remove whitelist") {
        return Some(Command::RemoveWhitelist(rest.trim().to_string()));
    }

    None
}

/// Usage text for the `help` command.
pub fn help_text() -> String {
    let mut text = String::from("Readtrack usage:\n");
    text.push_str("1. Send the acknowledgement keyword to be marked as read\n");
    text.push_str("2. \"<name><keyword>\" marks the named member as read\n");
    text.push_str("3. \"query read members\" — read summary for the window\n");
    text.push_str("4. \"query unread members\" — who has not read today\n");
    text.push_str("5. \"reset records\" — clear today's records (asks to confirm)\n");
    text.push_str("6. \"show roster\" / \"reload roster\" — roster management\n");
    text.push_str("7. \"test record <name>\" — diagnostic record\n");
    text.push_str("8. \"whitelist help\" — group allow-list commands\n");
    text
}

/// Usage text for the `whitelist help` command.
pub fn whitelist_help_text() -> String {
    let mut text = String::from("Whitelist help:\n");
    text.push_str("When the whitelist is non-empty, only listed groups are tracked; ");
    text.push_str("an empty whitelist means every group is tracked.\n\n");
    text.push_str("Direct-chat commands:\n");
    text.push_str("1. \"show whitelist\"\n");
    text.push_str("2. \"add whitelist <name-or-id>\"\n");
    text.push_str("3. \"remove whitelist <name-or-id>\"\n");
    text.push_str("4. \"clear whitelist\"\n\n");
    text.push_str("In-group commands:\n");
    text.push_str("1. \"add this group to whitelist\"\n");
    text.push_str("2. \"remove this group from whitelist\"\n\n");
    text.push_str("Name matches are substring matches over group names seen so far; ");
    text.push_str("if several groups match, they are listed and nothing changes. ");
    text.push_str("Use the group id for an exact match.\n");
    text
}
