use common::{ExitReason, TradeEvent};

/// Render a transition as the Telegram payload (HTML parse mode).
/// The square-off message carries no PROFIT/LOSS verdict — the close had
/// nothing to do with price.
pub fn render(event: &TradeEvent) -> String {
    match event {
        TradeEvent::Entered { proposal, time, .. } => format!(
            "🚀 <b>NEW {} ENTRY</b>\n\n\
             🕒 Time: {}\n\
             💰 Price: {}\n\
             🛑 SL: {}\n\
             🎯 Target: {}",
            proposal.kind,
            time.format("%H:%M"),
            proposal.entry,
            proposal.stop_loss,
            proposal.target,
        ),
        TradeEvent::Exited {
            kind,
            entry,
            exit_price,
            reason,
            time,
            ..
        } => match reason {
            ExitReason::SquareOff => format!(
                "⚠️ <b>INTRADAY AUTO-SQUARE OFF</b>\n\n\
                 🕒 Time: {}\n\
                 Type: {kind}\n\
                 Entry: {entry}\n\
                 Exit: {exit_price}\n\
                 Reason: Market Closing Soon",
                time.format("%H:%M"),
            ),
            ExitReason::Target => format!(
                "🏆 <b>TARGET HIT</b>\n\n\
                 Type: {kind}\n\
                 Entry: {entry}\n\
                 Exit: {exit_price}\n\
                 Result: ✅ PROFIT"
            ),
            ExitReason::StopLoss => format!(
                "❌ <b>STOP LOSS HIT</b>\n\n\
                 Type: {kind}\n\
                 Entry: {entry}\n\
                 Exit: {exit_price}\n\
                 Result: 🔻 LOSS"
            ),
        },
    }
}
