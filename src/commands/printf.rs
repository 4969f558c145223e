use clap::Args;
use linelog::Logger;

#[derive(Args, Debug)]
pub struct Cmd {
    #[arg(help = "Template where every {} is replaced by the next argument. Use {{ and }} for literal braces.")]
    pub template: String,

    #[arg(value_name = "ARG")]
    pub args: Vec<String>,
}

impl Cmd {
    pub fn run(&self, logger: &Logger) -> eyre::Result<()> {
        let msg = render(&self.template, &self.args)?;
        logger.infof(format_args!("{}", msg));
        Ok(())
    }
}

fn render(template: &str, args: &[String]) -> eyre::Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('{', Some('{')) | ('}', Some('}')) => {
                chars.next();
                out.push(c);
            }
            ('{', Some('}')) => {
                chars.next();
                let arg = args
                    .next()
                    .ok_or_else(|| eyre::eyre!("Template has more {{}} than arguments"))?;
                out.push_str(arg);
            }
            ('{', _) | ('}', _) => {
                return Err(eyre::eyre!("Unmatched '{}' in template '{}'", c, template));
            }
            _ => out.push(c),
        }
    }

    let unused = args.count();
    if unused > 0 {
        return Err(eyre::eyre!("{} argument(s) not used by the template", unused));
    }

    Ok(out)
}
