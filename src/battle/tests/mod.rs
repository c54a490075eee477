#[cfg(test)]
pub(crate) mod common;



#[cfg(test)]
mod test_stat_stages;

#[cfg(test)]
mod test_fainting;



#[cfg(test)]
mod test_hook_dispatch;
