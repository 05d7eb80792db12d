use lumen_native::demos::post_process::PostProcess;

fn main()
{
  lumen_native::launch::<PostProcess>();
}
