use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use news_ninja::{
    openai::OpenAIClient, tracing::init_tracing_subscriber, tts::GoogleTts, BroadcastRequest,
    Broadcaster, BroadcasterBuilder, DiscussionSource, GoogleNewsFeed, NoDiscussion,
    RateLimiter, RedditClient, RedditDiscussion, SourceBundle, SourceType, Topic,
};

#[derive(Parser)]
#[command(name = "news-ninja", about = "Topic news digests read aloud")]
struct Cli {
    /// API key for the chat completion service
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "LLM_BASE_URL", default_value = OpenAIClient::GROQ_BASE_URL)]
    llm_base_url: String,

    #[arg(long, env = "LLM_MODEL", default_value = OpenAIClient::DEFAULT_MODEL)]
    llm_model: String,

    /// Working directory for rendered audio
    #[arg(long, env = "AUDIO_DIR", default_value = "audio")]
    audio_dir: PathBuf,

    /// Maximum feed entries per topic
    #[arg(long, env = "MAX_ARTICLES", default_value = "10")]
    max_articles: usize,

    #[arg(long, env = "TTS_LANGUAGE", default_value = "en")]
    language: String,

    /// Include Reddit discussions when requested
    #[arg(long, env = "REDDIT_ENABLED", default_value_t = true, action = ArgAction::Set)]
    reddit_enabled: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Produce one broadcast and exit
    Run {
        /// Topic to cover, repeatable
        #[arg(long = "topic", required = true)]
        topics: Vec<String>,

        #[arg(long, value_enum, default_value_t = SourceType::News)]
        source_type: SourceType,

        /// Where to write the MP3
        #[arg(long, default_value = "news-summary.mp3")]
        output: PathBuf,
    },
    /// Start the HTTP API
    Serve {
        #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:1234")]
        bind_address: SocketAddr,
    },
}

/// Discussion backend chosen at startup
enum Discussion {
    Reddit(RedditDiscussion<RedditClient, OpenAIClient>),
    Disabled(NoDiscussion),
}

impl DiscussionSource for Discussion {
    fn is_available(&self) -> bool {
        match self {
            Discussion::Reddit(reddit) => reddit.is_available(),
            Discussion::Disabled(none) => none.is_available(),
        }
    }

    async fn discuss(&self, topics: &[Topic]) -> anyhow::Result<SourceBundle> {
        match self {
            Discussion::Reddit(reddit) => reddit.discuss(topics).await,
            Discussion::Disabled(none) => none.discuss(topics).await,
        }
    }
}

type NewsBroadcaster = Broadcaster<GoogleNewsFeed, OpenAIClient, Discussion, GoogleTts>;

fn build_broadcaster(cli: &Cli, limiter: Arc<RateLimiter>) -> anyhow::Result<NewsBroadcaster> {
    let openai = OpenAIClient::new(&cli.api_key)?
        .with_base_url(&cli.llm_base_url)
        .with_model(&cli.llm_model);

    let discussion = if cli.reddit_enabled {
        Discussion::Reddit(RedditDiscussion::new(RedditClient::new()?, openai.clone()))
    } else {
        tracing::info!("Reddit discussions disabled");
        Discussion::Disabled(NoDiscussion)
    };

    let broadcaster = BroadcasterBuilder::new(&cli.audio_dir)
        .feed(GoogleNewsFeed::new()?.with_max_articles(cli.max_articles))
        .model(openai)
        .discussion(discussion)
        .speech(GoogleTts::new()?)
        .rate_limiter(limiter)
        .language(&cli.language)
        .build();

    Ok(broadcaster)
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    // one limiter for the whole process
    let limiter = Arc::new(RateLimiter::default());

    match &cli.command {
        Command::Run {
            topics,
            source_type,
            output,
        } => {
            let broadcaster =
                news_ninja::blocking::Broadcaster::new(build_broadcaster(&cli, limiter)?)?;
            let request = BroadcastRequest::new(topics.iter().cloned(), *source_type);

            let broadcast = broadcaster.run(&request)?;
            std::fs::write(output, &broadcast.audio)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            tracing::info!(output = ?output, bytes = broadcast.audio.len(), "Saved broadcast");
            println!("{}", broadcast.script);
        }
        Command::Serve { bind_address } => {
            let broadcaster = Arc::new(build_broadcaster(&cli, limiter)?);
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(news_ninja::server::serve(*bind_address, broadcaster))?;
        }
    }

    Ok(())
}
