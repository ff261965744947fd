use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use persona_rag::application::FineTuneService;
use persona_rag::domain::FineTuneStatus;
use persona_rag::infrastructure::{files, telemetry, AppConfig, OpenAiFineTune, OpenAiLlm};

#[derive(Parser, Debug)]
#[command(name = "fine-tune", about = "Build, submit and check a fine-tuned persona model")]
struct FineTuneCli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert the Q/A JSON file into a JSONL training file
    Prepare {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Upload the training file and start a fine-tuning job
    Submit {
        #[arg(long)]
        training_file: Option<PathBuf>,
        /// Base model to fine-tune (overrides `fine_tune.base_model`)
        #[arg(long)]
        model: Option<String>,
    },
    /// Poll a job until it finishes; defaults to the saved job id
    Status {
        job_id: Option<String>,
        #[arg(long)]
        poll_interval_secs: Option<u64>,
    },
    /// Send one greeting to the fine-tuned model (`MODEL_V1`)
    Smoke {
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("fine_tune=info,persona_rag=info");

    let cli = FineTuneCli::parse();
    let app_config = AppConfig::load()?;
    let config = &app_config.config.fine_tune;

    match cli.command {
        Command::Prepare { input, output } => {
            let input = input.unwrap_or_else(|| config.training_data.clone());
            let output = output.unwrap_or_else(|| config.training_file.clone());

            let written = FineTuneService::prepare(&input, &output)
                .await
                .with_context(|| format!("failed to convert {}", input.display()))?;
            info!(examples = written, output = %output.display(), "wrote training file");
        }
        Command::Submit {
            training_file,
            model,
        } => {
            let training_file = training_file.unwrap_or_else(|| config.training_file.clone());
            let model = model.unwrap_or_else(|| config.base_model.clone());

            let service = FineTuneService::new(Arc::new(OpenAiFineTune::from_env(&config.api_base)?));
            let job = service
                .submit(&training_file, &model, &config.job_id_file)
                .await
                .context("failed to submit fine-tuning job")?;
            info!(job_id = %job.id, job_id_file = %config.job_id_file.display(), "job submitted");
            println!("{}", job.id);
        }
        Command::Status {
            job_id,
            poll_interval_secs,
        } => {
            let job_id = match job_id {
                Some(id) => id,
                None => files::read_job_id(&config.job_id_file).await?,
            };
            let interval =
                Duration::from_secs(poll_interval_secs.unwrap_or(config.poll_interval_seconds));

            let service = FineTuneService::new(Arc::new(OpenAiFineTune::from_env(&config.api_base)?));
            let job = service.wait_for_completion(&job_id, interval).await?;

            match (job.status, job.fine_tuned_model) {
                (FineTuneStatus::Succeeded, Some(model)) => println!("{model}"),
                (status, _) => bail!("job {} finished with status {:?}", job.id, status),
            }
        }
        Command::Smoke { model } => {
            let Some(model) = model.or_else(|| config.model_id.clone()) else {
                bail!("no fine-tuned model configured; set MODEL_V1 or pass --model");
            };
            info!(model = %model, "using model");

            let prompts = &app_config.prompts;
            let system = format!(
                "You are {}. {}",
                prompts.persona.name, prompts.smoke_test.system
            );
            let llm = OpenAiLlm::from_env(model);
            let reply = FineTuneService::smoke_test(&llm, &system, &prompts.smoke_test.user).await?;
            println!("{reply}");
        }
    }

    Ok(())
}
