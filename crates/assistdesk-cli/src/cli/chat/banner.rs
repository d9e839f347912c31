//! Welcome banner display for chat sessions.

use console::style;

use assistdesk_types::chat::ChatMode;

/// Print the welcome banner at the start of a chat session.
///
/// Shows the mode title, the backend it talks to, one of the mode's
/// greeting lines, and a hint about slash commands.
pub fn print_welcome_banner(mode: ChatMode, backend_url: &str, conversation_id: &str) {
    let greeting = mode.placeholders().first().copied().unwrap_or("Ask me anything.");

    println!();
    println!("  {} {}", style("*").cyan(), style(mode.title()).cyan().bold());
    println!("  {}", style(greeting).dim());
    println!();
    println!("  {}  {}", style("Backend:").bold(), style(backend_url).dim());
    println!(
        "  {}  {}",
        style("Conversation:").bold(),
        style(&conversation_id[..8.min(conversation_id.len())]).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+C stops a reply, Ctrl+D exits").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
