use anyhow::Result;

use docform::{Config, FormClient, PageForm};

use super::output::truncate_text;

pub async fn cmd_forms(url: Option<String>) -> Result<()> {
    let (client, url) = match url {
        Some(url) => (FormClient::new(&url)?, url),
        None => {
            let config = Config::load()?;
            (FormClient::from_config(&config)?, config.base_url)
        }
    };

    println!("Fetching form page: {url}");
    let html = client.fetch_page(&url).await?;
    let forms = PageForm::parse_all(&html)?;

    if forms.is_empty() {
        anyhow::bail!("No forms found on page");
    }

    for form in &forms {
        println!();
        match &form.endpoint {
            Some(endpoint) => println!("📝 {} → POST {endpoint}", form.id),
            None => println!("📝 {} → (no endpoint: missing 'feature' field)", form.id),
        }
        for (name, value) in &form.fields {
            println!("   field  {name} = {}", truncate_text(value, 40));
        }
        for name in &form.file_inputs {
            println!("   file   {name}");
        }
        for submitter in &form.submitters {
            if submitter.name.is_empty() {
                println!("   submit \"{}\"", submitter.label);
            } else {
                println!(
                    "   submit \"{}\" ({}={})",
                    submitter.label, submitter.name, submitter.value
                );
            }
        }
    }

    println!("\n({} forms)", forms.len());
    Ok(())
}
