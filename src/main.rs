//! campusbot Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Update};
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use campusbot::{
    config::Settings,
    database::{
        connection::{create_pool, run_migrations},
        DatabaseService,
    },
    handlers::{commands, EventRouter, InboundEvent, MenuRegistry, Reply},
    keyboards,
    services::{courier::TelegramCourier, NotificationService},
    state::StateStorage,
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration; a missing bot token is fatal here, not later.
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard must outlive the dispatcher.
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting campusbot...");

    // Initialize database connection and schema
    info!("Connecting to database...");
    let pool = create_pool(&settings.database).await?;
    run_migrations(&pool).await?;
    let db = DatabaseService::new(pool);

    // The menu table is validated before the first update is accepted.
    let menu = MenuRegistry::new();
    menu.validate()?;

    let bot = Bot::new(&settings.bot.token);
    let notifier = NotificationService::new(Arc::new(TelegramCourier::new(bot.clone())));
    let router = Arc::new(EventRouter::new(
        db,
        StateStorage::new(),
        menu,
        notifier,
        settings.bot.admin_ids.clone(),
    ));

    info!("campusbot is ready!");

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![router])
        .default_handler(|update| async move {
            warn!("Unhandled update: {:?}", update);
        })
        .enable_ctrlc_handler()
        .build();

    dispatcher.dispatch().await;

    info!("campusbot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_command),
                )
                .branch(dptree::endpoint(handle_message)),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback))
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "campusbot commands")]
enum Command {
    #[command(description = "Register and show your menu")]
    Start,
    #[command(description = "Show available actions")]
    Help,
}

/// Handle bot commands
async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    router: Arc<EventRouter>,
) -> HandlerResult {
    // The bot works in private chats only.
    if !msg.chat.id.is_user() {
        return Ok(());
    }
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let actor_id = user.id.0 as i64;

    let reply = match cmd {
        Command::Start => {
            commands::handle_start(&router, actor_id, user.username.clone(), user.full_name())
                .await?
        }
        Command::Help => commands::handle_help(&router, actor_id).await?,
    };

    send_reply(&bot, msg.chat.id, &router, reply).await
}

/// Handle regular text messages
async fn handle_message(bot: Bot, msg: Message, router: Arc<EventRouter>) -> HandlerResult {
    if !msg.chat.id.is_user() {
        return Ok(());
    }
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let event = InboundEvent::text(user.id.0 as i64, text);
    if let Some(reply) = router.handle_event(event).await? {
        send_reply(&bot, msg.chat.id, &router, reply).await?;
    }

    Ok(())
}

/// Handle inline keyboard callbacks
async fn handle_callback(bot: Bot, query: CallbackQuery, router: Arc<EventRouter>) -> HandlerResult {
    // Answer first to clear the button's loading state.
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, "Failed to answer callback query");
    }

    let Some(data) = query.data else {
        return Ok(());
    };
    let actor_id = query.from.id.0 as i64;

    let event = InboundEvent::selection(actor_id, data);
    if let Some(reply) = router.handle_event(event).await? {
        send_reply(&bot, ChatId(actor_id), &router, reply).await?;
    }

    Ok(())
}

/// Deliver a reply with its rendered keyboard.
async fn send_reply(
    bot: &Bot,
    chat_id: ChatId,
    router: &EventRouter,
    reply: Reply,
) -> HandlerResult {
    let mut request = bot.send_message(chat_id, reply.text.clone());
    if let Some(markup) = keyboards::render(&reply.markup, router.menu()) {
        request = request.reply_markup(markup);
    }
    request.await?;

    Ok(())
}
